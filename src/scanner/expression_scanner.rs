use regex::Regex;
use tracing::warn;

use crate::{catalog::{ColumnCatalog, ColumnNamespace}, scanner::UsedColumn};

/// Anything that cannot be part of an identifier delimits a token.
const TOKEN_BOUNDARY: &str = "[^a-zA-Z0-9_]";

pub struct ExpressionScanner;

impl ExpressionScanner {
    /// Names of the known columns referenced as whole tokens in `expression`.
    ///
    /// Namespaces are tried custom first, then schema, then data-source. A
    /// name already matched in an earlier namespace is not reported again.
    pub fn find_used_column_names(
        expression: &str,
        schema_names: &[String],
        custom_names: &[String],
        ds_names: &[String],
    ) -> Vec<String> {
        Self::scan(expression, schema_names, custom_names, ds_names)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    pub fn scan(
        expression: &str,
        schema_names: &[String],
        custom_names: &[String],
        ds_names: &[String],
    ) -> Vec<UsedColumn> {
        // padding lets the boundary class match at both ends of the text
        let padded = format!(" {expression} ");
        let namespaces = [
            (ColumnNamespace::Custom, custom_names),
            (ColumnNamespace::Schema, schema_names),
            (ColumnNamespace::DataSource, ds_names),
        ];

        let mut used: Vec<UsedColumn> = Vec::new();
        for (namespace, names) in namespaces {
            for name in names {
                if used.iter().any(|u| &u.name == name) {
                    continue;
                }
                if Self::mentions(&padded, name) {
                    used.push(UsedColumn { name: name.clone(), namespace });
                }
            }
        }
        used
    }

    pub fn scan_catalog(expression: &str, catalog: &ColumnCatalog) -> Vec<UsedColumn> {
        Self::scan(
            expression,
            &catalog.schema_names(),
            &catalog.custom_names(),
            &catalog.data_source_names(),
        )
    }

    /// Whether `name` occurs in `padded` between two non-identifier characters.
    /// The name itself is always matched literally.
    pub fn mentions(padded: &str, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let pattern = format!("{TOKEN_BOUNDARY}{}{TOKEN_BOUNDARY}", regex::escape(name));
        match Regex::new(&pattern) {
            Ok(re) => re.is_match(padded),
            Err(e) => {
                warn!(target: "jitframe", column = name, "cannot build token matcher: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_tests::fixtures::catalog;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn in_schema(expression: &str, schema: &[String]) -> Vec<String> {
        ExpressionScanner::find_used_column_names(expression, schema, &[], &[])
    }

    #[test]
    fn matches_whole_tokens_only() {
        let used = in_schema("xy+1", &names(&["x", "xy"]));
        assert_eq!(used, names(&["xy"]));
    }

    #[test]
    fn matches_at_expression_edges() {
        let schema = names(&["pt", "eta"]);
        assert_eq!(in_schema("pt", &schema), names(&["pt"]));
        assert_eq!(in_schema("eta>2&&pt", &schema), names(&["pt", "eta"]));
        assert!(in_schema("", &schema).is_empty());
        assert!(in_schema("pt_2 + my_eta", &schema).is_empty());
    }

    #[test]
    fn data_source_match_already_seen_in_custom_is_skipped() {
        let used = ExpressionScanner::scan("a+b", &[], &names(&["a"]), &names(&["a", "b"]));
        assert_eq!(used, vec![
            UsedColumn { name: "a".into(), namespace: ColumnNamespace::Custom },
            UsedColumn { name: "b".into(), namespace: ColumnNamespace::DataSource },
        ]);
    }

    #[test]
    fn schema_match_already_seen_in_custom_is_skipped() {
        let used = ExpressionScanner::scan("a * 2 + c", &names(&["a", "c"]), &names(&["a"]), &[]);
        assert_eq!(used, vec![
            UsedColumn { name: "a".into(), namespace: ColumnNamespace::Custom },
            UsedColumn { name: "c".into(), namespace: ColumnNamespace::Schema },
        ]);
    }

    #[test]
    fn pattern_characters_in_names_are_literal() {
        // "m.x" must not behave like the pattern "m.x" and match "mAx"
        let schema = names(&["m.x", "v[0]", "a+b"]);
        assert!(ExpressionScanner::find_used_column_names("mAx > 1", &schema, &[], &[]).is_empty());
        assert_eq!(
            ExpressionScanner::find_used_column_names("m.x > 1 && v[0] < a+b ", &schema, &[], &[]),
            schema
        );
    }

    #[test]
    fn scanning_is_idempotent() {
        let c = catalog(&[("x", "int"), ("y", "int")], &[("z", "double")], &[("w", "float")]);
        let first = ExpressionScanner::scan_catalog("w + y * z - x", &c);
        let second = ExpressionScanner::scan_catalog("w + y * z - x", &c);
        assert_eq!(first, second);
        let order: Vec<_> = first.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(order, vec!["z", "x", "y", "w"]);
    }
}
