use std::fmt;

/// Binary set operator joining two adjacent terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOperator {
    /// Intersection
    And,
    /// Union
    Or,
    /// Difference: left minus right, never a unary complement
    Not,
}

impl BoolOperator {
    /// Match a keyword exactly; `and`, `Or` and friends are ordinary terms
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        };
        f.write_str(keyword)
    }
}

/// Query split into its term and operator sequences.
///
/// Operators are positional: `operators[i]` joins the running result with
/// `terms[i + 1]`. Where keywords sit relative to terms is not recorded, so
/// `NOT a b` and `a NOT b` parse identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<String>,
    pub operators: Vec<BoolOperator>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Renders the query as it is evaluated, dropping unmatched operators or terms
impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.terms.split_first() else {
            return Ok(());
        };
        f.write_str(first)?;
        for (op, term) in self.operators.iter().zip(rest) {
            write!(f, " {} {}", op, term)?;
        }
        Ok(())
    }
}

/// Parse a whitespace separated query
pub fn parse_query(input: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();

    for token in input.split_whitespace() {
        match BoolOperator::from_keyword(token) {
            Some(op) => query.operators.push(op),
            None => query.terms.push(token.to_string()),
        }
    }

    query
}
