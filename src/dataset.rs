//! Minimal interface over tabular data, and an in-memory implementation.
//!
//! Channel construction only needs three things from a dataset: its
//! distinct records with their multiplicities, value counts for a single
//! attribute, and the number of records. Any store that can answer these
//! (an array of records, a columnar store, ...) can implement `Dataset`.
use ndarray::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::errors::DataError;

/// A fixed-schema collection of records.
pub trait Dataset {
    /// Type of the attributes' values.
    type Value: Clone + Eq + Hash + Ord + Debug;

    /// Names of the attributes, in the order values appear in a record.
    fn attributes(&self) -> &[String];

    /// Returns each distinct record, together with the number of times
    /// it occurs.
    fn distinct_rows(&self) -> Vec<(Vec<Self::Value>, usize)>;

    /// Counts the occurrences of each value of attribute `name`.
    fn count_by_attribute(&self, name: &str)
        -> Result<HashMap<Self::Value, usize>, DataError>;

    /// Number of records, duplicates included.
    fn total_count(&self) -> usize;

    /// Position of attribute `name` within a record.
    fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|a| a == name)
    }
}

/// Records stored row-wise in a 2D array: one row per record, one
/// column per attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V> {
    attributes: Vec<String>,
    rows: Array2<V>,
}

fn check_unique(attributes: &[String]) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for a in attributes {
        if !seen.insert(a) {
            return Err(DataError::DuplicateAttribute(a.clone()));
        }
    }
    Ok(())
}

impl<V> Table<V>
        where V: Clone + Eq + Hash + Ord + Debug {
    /// Creates a table from a schema and an array whose columns follow it.
    pub fn new<S>(attributes: &[S], rows: Array2<V>)
            -> Result<Table<V>, DataError>
            where S: AsRef<str> {
        let attributes = attributes.iter()
                                   .map(|a| a.as_ref().to_string())
                                   .collect::<Vec<_>>();
        check_unique(&attributes)?;

        if rows.ncols() != attributes.len() {
            return Err(DataError::ShapeMismatch {
                expected: attributes.len(),
                found: rows.ncols(),
            });
        }

        Ok(Table { attributes, rows })
    }

    /// Creates a table from a list of records, each holding one value
    /// per attribute in schema order.
    pub fn from_records<S>(attributes: &[S], records: Vec<Vec<V>>)
            -> Result<Table<V>, DataError>
            where S: AsRef<str> {
        let d = attributes.len();
        let n = records.len();

        let mut values = Vec::with_capacity(n * d);
        for record in records {
            if record.len() != d {
                return Err(DataError::ShapeMismatch {
                    expected: d,
                    found: record.len(),
                });
            }
            values.extend(record);
        }

        let rows = Array::from_shape_vec((n, d), values)
                         .map_err(|_| DataError::ShapeMismatch {
                             expected: d,
                             found: 0,
                         })?;
        Table::new(attributes, rows)
    }

    /// Creates a table from records given as attribute-to-value mappings.
    ///
    /// The schema is the first record's key set, sorted by name; every
    /// other record must have exactly the same keys.
    pub fn from_maps(records: Vec<HashMap<String, V>>)
            -> Result<Table<V>, DataError> {
        let mut attributes = match records.first() {
            Some(first) => first.keys().cloned().collect::<Vec<_>>(),
            None => vec![],
        };
        attributes.sort();

        let mut rows = Vec::with_capacity(records.len());
        for (i, mut record) in records.into_iter().enumerate() {
            if record.len() != attributes.len() {
                return Err(DataError::SchemaMismatch(i));
            }
            let row = attributes.iter()
                                .map(|a| record.remove(a))
                                .collect::<Option<Vec<_>>>()
                                .ok_or(DataError::SchemaMismatch(i))?;
            rows.push(row);
        }

        Table::from_records(&attributes[..], rows)
    }

    pub fn nrows(&self) -> usize {
        self.rows.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.rows.ncols()
    }

    /// Values of attribute `name`, one per record.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, V>> {
        self.attribute_index(name)
            .map(|j| self.rows.column(j))
    }

    pub fn rows(&self) -> ArrayView2<'_, V> {
        self.rows.view()
    }
}

impl<V> Dataset for Table<V>
        where V: Clone + Eq + Hash + Ord + Debug {
    type Value = V;

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn distinct_rows(&self) -> Vec<(Vec<V>, usize)> {
        let mut position: HashMap<Vec<V>, usize> = HashMap::new();
        let mut distinct: Vec<(Vec<V>, usize)> = Vec::new();

        for record in self.rows.outer_iter() {
            let record = record.to_vec();
            match position.get(&record) {
                Some(&i) => distinct[i].1 += 1,
                None => {
                    position.insert(record.clone(), distinct.len());
                    distinct.push((record, 1));
                },
            }
        }

        distinct
    }

    fn count_by_attribute(&self, name: &str)
            -> Result<HashMap<V, usize>, DataError> {
        let values = self.column(name)
                         .ok_or_else(|| DataError::UnknownAttribute(name.to_string()))?;

        let mut counts = HashMap::new();
        for v in values.iter() {
            *counts.entry(v.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn total_count(&self) -> usize {
        self.rows.nrows()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy() -> Table<u32> {
        Table::new(&["age", "zip", "disease"],
                   array![[30, 100, 1],
                          [30, 100, 1],
                          [41, 200, 0],
                          [30, 100, 0],
                          [41, 200, 0]]).unwrap()
    }

    #[test]
    fn test_distinct_rows() {
        let table = toy();
        let rows = table.distinct_rows();

        assert_eq!(rows, vec![(vec![30, 100, 1], 2),
                              (vec![41, 200, 0], 2),
                              (vec![30, 100, 0], 1)]);
        assert_eq!(rows.iter().map(|(_, c)| c).sum::<usize>(),
                   table.total_count());
    }

    #[test]
    fn test_count_by_attribute() {
        let table = toy();

        let counts = table.count_by_attribute("disease").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&0], 3);
        assert_eq!(counts[&1], 2);

        assert_eq!(table.count_by_attribute("name"),
                   Err(DataError::UnknownAttribute("name".to_string())));
    }

    #[test]
    fn test_schema_validation() {
        let dup = Table::new(&["a", "b", "a"], Array2::<u32>::zeros((2, 3)));
        assert_eq!(dup, Err(DataError::DuplicateAttribute("a".to_string())));

        let narrow = Table::new(&["a", "b"], Array2::<u32>::zeros((2, 3)));
        assert_eq!(narrow, Err(DataError::ShapeMismatch { expected: 2, found: 3 }));

        let ragged = Table::from_records(&["a", "b"], vec![vec![1, 2], vec![3]]);
        assert_eq!(ragged, Err(DataError::ShapeMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_from_maps() {
        let record = |zip: &str, disease: &str| {
            let mut r = HashMap::new();
            r.insert("zip".to_string(), zip.to_string());
            r.insert("disease".to_string(), disease.to_string());
            r
        };

        let table = Table::from_maps(vec![record("100", "flu"),
                                          record("200", "cold")]).unwrap();
        // Schema is sorted by name.
        assert_eq!(table.attributes(), &["disease".to_string(), "zip".to_string()]);
        assert_eq!(table.column("zip").unwrap().to_vec(),
                   vec!["100".to_string(), "200".to_string()]);

        let mut odd = record("300", "flu");
        odd.remove("zip");
        odd.insert("age".to_string(), "40".to_string());
        let res = Table::from_maps(vec![record("100", "flu"), odd]);
        assert_eq!(res, Err(DataError::SchemaMismatch(1)));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::<u32>::from_records(&["a", "b"], vec![]).unwrap();
        assert_eq!(table.total_count(), 0);
        assert!(table.distinct_rows().is_empty());
        assert!(table.count_by_attribute("a").unwrap().is_empty());
    }
}
