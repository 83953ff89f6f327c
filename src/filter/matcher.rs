use super::error::FilterError;
use super::types::{FilterOrderInfo, Predicate, SortDirection, Value};
use std::cmp::Ordering;

/// Column access for records evaluated outside the database.
pub trait Fields {
    fn table() -> &'static str
    where
        Self: Sized;

    fn field(&self, column: &str) -> Option<Value>;
}

impl Predicate {
    /// Evaluates the predicate against a record with the same semantics as the SQL form.
    pub fn matches<R: Fields>(&self, record: &R) -> Result<bool, FilterError> {
        match self {
            Predicate::Always => Ok(true),
            Predicate::Never => Ok(false),
            Predicate::Eq(column, value) => {
                let actual = lookup(record, column)?;
                if value.is_null() {
                    Ok(actual.is_null())
                } else {
                    Ok(actual.sql_eq(value))
                }
            }
            Predicate::Ne(column, value) => {
                let actual = lookup(record, column)?;
                if value.is_null() {
                    Ok(!actual.is_null())
                } else {
                    Ok(!actual.is_null() && !actual.sql_eq(value))
                }
            }
            Predicate::And(parts) => {
                for part in parts {
                    if !part.matches(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

/// Compares two records by an ORDER BY list.
pub fn compare_by<R: Fields>(a: &R, b: &R, order: &[FilterOrderInfo]) -> Ordering {
    for info in order {
        let left = a.field(&info.column).unwrap_or(Value::Null(crate::filter::ValueKind::Text));
        let right = b.field(&info.column).unwrap_or(Value::Null(crate::filter::ValueKind::Text));
        let ordering = match info.sort {
            SortDirection::Asc => left.sort_cmp(&right),
            SortDirection::Desc => right.sort_cmp(&left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn lookup<R: Fields>(record: &R, column: &str) -> Result<Value, FilterError> {
    record.field(column).ok_or_else(|| FilterError::UnknownColumn {
        table: R::table(),
        column: column.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOrder;

    struct Row {
        name: &'static str,
        parent: Option<&'static str>,
        rank: i64,
    }

    impl Fields for Row {
        fn table() -> &'static str {
            "rows"
        }

        fn field(&self, column: &str) -> Option<Value> {
            match column {
                "name" => Some(self.name.into()),
                "parent" => Some(self.parent.map(str::to_string).into()),
                "rank" => Some(self.rank.into()),
                _ => None,
            }
        }
    }

    fn row(name: &'static str, parent: Option<&'static str>, rank: i64) -> Row {
        Row { name, parent, rank }
    }

    #[test]
    fn null_semantics_follow_sql() {
        let orphan = row("a", None, 1);
        assert!(Predicate::eq("parent", None::<String>).matches(&orphan).unwrap());
        assert!(!Predicate::eq("parent", "b").matches(&orphan).unwrap());
        assert!(!Predicate::ne("parent", "b").matches(&orphan).unwrap());
    }

    #[test]
    fn composite_predicates() {
        let r = row("a", Some("p"), 3);
        let p = Predicate::eq("name", "a").and(Predicate::ne("rank", 2_i64));
        assert!(p.matches(&r).unwrap());
        assert!(!p.and(Predicate::eq("parent", "q")).matches(&r).unwrap());
        assert!(!Predicate::eq("name", "a").and(Predicate::Never).matches(&r).unwrap());
    }

    #[test]
    fn unknown_columns_are_errors() {
        let err = Predicate::eq("missing", 1_i64).matches(&row("a", None, 1)).unwrap_err();
        assert_eq!(err, FilterError::UnknownColumn { table: "rows", column: "missing".into() });
    }

    #[test]
    fn compare_by_honours_direction() {
        let order = FilterOrder::parse("rank desc, name").unwrap();
        let mut rows = vec![row("b", None, 1), row("a", None, 2), row("c", None, 2)];
        rows.sort_by(|a, b| compare_by(a, b, &order));
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
