use super::error::FilterError;
use super::types::{Predicate, Value};

/// Compiles a [`Predicate`] into a parameterised WHERE clause (`$1`, `$2`, ...).
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the clause and the parameters it references, in placeholder order.
    pub fn generate(predicate: &Predicate, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let sql = filter_where.build(predicate)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn validate_column(column: &str) -> Result<(), FilterError> {
        let mut chars = column.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }

    fn build(&mut self, predicate: &Predicate) -> Result<String, FilterError> {
        match predicate {
            Predicate::Always => Ok("1=1".to_string()),
            Predicate::Never => Ok("1=0".to_string()),
            Predicate::Eq(column, value) => {
                let quoted = Self::quote(column)?;
                if value.is_null() {
                    Ok(format!("{} IS NULL", quoted))
                } else {
                    Ok(format!("{} = {}", quoted, self.param(value.clone())))
                }
            }
            Predicate::Ne(column, value) => {
                let quoted = Self::quote(column)?;
                if value.is_null() {
                    Ok(format!("{} IS NOT NULL", quoted))
                } else {
                    Ok(format!("{} <> {}", quoted, self.param(value.clone())))
                }
            }
            Predicate::And(parts) => {
                if parts.is_empty() {
                    return Ok("1=1".to_string());
                }
                let mut sql_parts = Vec::with_capacity(parts.len());
                for part in parts {
                    sql_parts.push(format!("({})", self.build(part)?));
                }
                Ok(sql_parts.join(" AND "))
            }
        }
    }

    fn quote(column: &str) -> Result<String, FilterError> {
        Self::validate_column(column)?;
        Ok(format!("\"{}\"", column))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn equality_binds_a_parameter() {
        let id = Uuid::new_v4();
        let (sql, params) = FilterWhere::generate(&Predicate::eq("owner_id", id), 0).unwrap();
        assert_eq!(sql, "\"owner_id\" = $1");
        assert_eq!(params, vec![Value::Uuid(id)]);
    }

    #[test]
    fn null_equality_becomes_is_null() {
        let (sql, params) = FilterWhere::generate(&Predicate::eq("agency_id", None::<Uuid>), 0).unwrap();
        assert_eq!(sql, "\"agency_id\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn conjunction_numbers_parameters_in_order() {
        let predicate = Predicate::eq("status", "pending")
            .and(Predicate::eq("category", "roads"))
            .and(Predicate::ne("agency_id", None::<Uuid>));
        let (sql, params) = FilterWhere::generate(&predicate, 1).unwrap();
        assert_eq!(sql, "(\"status\" = $2) AND (\"category\" = $3) AND (\"agency_id\" IS NOT NULL)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn trivial_predicates_render_constants() {
        assert_eq!(FilterWhere::generate(&Predicate::Always, 0).unwrap().0, "1=1");
        assert_eq!(FilterWhere::generate(&Predicate::Never, 0).unwrap().0, "1=0");
        assert_eq!(FilterWhere::generate(&Predicate::And(vec![]), 0).unwrap().0, "1=1");
    }

    #[test]
    fn rejects_injected_column_names() {
        let result = FilterWhere::generate(&Predicate::eq("name\"; DROP TABLE accounts; --", "x"), 0);
        assert!(matches!(result, Err(FilterError::InvalidColumn(_))));
    }

    #[test]
    fn inequality_binds_a_parameter() {
        let (sql, params) = FilterWhere::generate(&Predicate::ne("name", "Roads"), 0).unwrap();
        assert_eq!(sql, "\"name\" <> $1");
        assert_eq!(params, vec![Value::from("Roads")]);
    }
}
