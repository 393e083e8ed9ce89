//! Opaque-identifier catalog lookup `FrameSource`, standing in for a
//! datastore/filestore resolver keyed by scan UID rather than a path or
//! linear frame number.

use ndarray::Array2;

use crate::io::source::{FrameSource, LoadError};

/// Resolves an opaque identifier (as produced by `catalog`) to pixel data.
/// A thin seam over whatever datastore client the deployment actually uses.
pub trait CatalogResolver: Send + Sync {
    fn resolve(&self, uid: &str) -> Result<Array2<u32>, LoadError>;
}

pub struct CatalogFrameSource<R: CatalogResolver> {
    /// Row-major list of per-cell identifiers, length `rows * cols`.
    pub catalog: Vec<String>,
    pub resolver: R,
    pub cols: usize,
    /// Identifier of the designated reference frame, independent of `catalog`.
    pub reference_uid: String,
}

impl<R: CatalogResolver> FrameSource for CatalogFrameSource<R> {
    fn load_cell(&self, row: usize, col: usize) -> Result<Array2<u32>, LoadError> {
        let index = row * self.cols + col;
        let uid = self.catalog.get(index).ok_or(LoadError::NotFound)?;
        self.resolver.resolve(uid)
    }

    fn load_reference(&self) -> Result<Array2<u32>, LoadError> {
        self.resolver.resolve(&self.reference_uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapResolver(HashMap<String, Array2<u32>>);

    impl CatalogResolver for MapResolver {
        fn resolve(&self, uid: &str) -> Result<Array2<u32>, LoadError> {
            self.0.get(uid).cloned().ok_or(LoadError::NotFound)
        }
    }

    #[test]
    fn unresolved_identifier_is_not_found() {
        let source = CatalogFrameSource {
            catalog: vec!["a".into(), "b".into()],
            resolver: MapResolver(HashMap::new()),
            cols: 2,
            reference_uid: "ref".into(),
        };
        assert!(matches!(source.load_cell(0, 0), Err(LoadError::NotFound)));
        assert!(matches!(source.load_reference(), Err(LoadError::NotFound)));
    }

    #[test]
    fn resolves_cell_by_row_major_index() {
        let mut map = HashMap::new();
        map.insert("c01".to_string(), Array2::from_elem((2, 2), 7u32));
        let source = CatalogFrameSource {
            catalog: vec!["c00".into(), "c01".into(), "c10".into(), "c11".into()],
            resolver: MapResolver(map),
            cols: 2,
            reference_uid: "c01".into(),
        };
        assert_eq!(source.load_cell(0, 1).unwrap()[[0, 0]], 7);
        assert_eq!(source.load_reference().unwrap()[[1, 1]], 7);
    }
}
