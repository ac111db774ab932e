//! PostgREST query-string builder.

use std::fmt::Display;

#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// `column=eq.value`
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// `column=in.(a,b,c)`
    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.to_string(), format!("in.({})", joined)));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), format!("{}.desc", column)));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_filters_in_order() {
        let query = Query::new()
            .select("*")
            .eq("user_id", "u1")
            .eq("request_id", 42)
            .order_desc("created_at")
            .limit(1);

        let pairs: Vec<(&str, &str)> = query
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("select", "*"),
                ("user_id", "eq.u1"),
                ("request_id", "eq.42"),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]
        );
    }

    #[test]
    fn test_in_list() {
        let query = Query::new().in_list("id", ["a", "b", "c"]);
        assert_eq!(query.pairs()[0].1, "in.(a,b,c)");
    }
}
