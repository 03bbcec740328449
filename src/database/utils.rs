use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

/// Collapses whitespace and rewrites `?` placeholders into Postgres `$n` form.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &regex::Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_order() {
        let query = sql(r#"
            UPDATE matches
            SET home_score = home_score + ?
            WHERE id = ?
        "#);
        assert_eq!(
            query,
            "UPDATE matches SET home_score = home_score + $1 WHERE id = $2"
        );
    }
}
