//! Property-equality lookups
//!
//! `find` is expressed as an ordinary parameterised query over every node;
//! predicate values travel as named parameters, never inlined into the text.

use crate::graph::Properties;

/// How the predicate's conditions combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every key must match
    #[default]
    All,
    /// At least one key must match
    Any,
}

fn quote_identifier(key: &str) -> String {
    format!("`{}`", key.replace('`', "``"))
}

/// Build the query text and parameters for a property-equality lookup
pub fn find_query(predicate: &Properties, mode: MatchMode) -> (String, Properties) {
    let mut params = Properties::new();
    let mut conditions = Vec::with_capacity(predicate.len());

    for (index, (key, value)) in predicate.iter().enumerate() {
        let param = format!("p{}", index);
        conditions.push(format!("n.{}! = {{{}}}", quote_identifier(key), param));
        params.insert(param, value.clone());
    }

    let mut query = String::from("START n = node(*)");
    if !conditions.is_empty() {
        let joiner = match mode {
            MatchMode::All => " AND ",
            MatchMode::Any => " OR ",
        };
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(joiner));
    }
    query.push_str(" RETURN n");
    (query, params)
}
