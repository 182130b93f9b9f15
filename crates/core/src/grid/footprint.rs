use crate::{
    error::GridError,
    grid::{TriAddress, TriVector},
};
use serde::{Deserialize, Serialize};

/// The shape of a multi-triangle template (e.g. a building or a formation),
/// stored as offsets relative to an anchor triangle. Each offset is applied to
/// an anchor address with [TriAddress::translate] to get the absolute
/// footprint.
///
/// Offsets only produce valid addresses when applied to an anchor with the
/// same pointing as the one the shape was designed around. Placing a
/// north-anchored shape on a south-pointing triangle fails.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Footprint {
    offsets: Vec<TriVector>,
}

impl Footprint {
    pub fn new(offsets: Vec<TriVector>) -> Self {
        Self { offsets }
    }

    /// Capture the shape of a set of absolute addresses, relative to `origin`
    pub fn from_addresses(
        origin: TriAddress,
        addresses: impl IntoIterator<Item = TriAddress>,
    ) -> Self {
        let origin = TriVector::from(origin);
        Self {
            offsets: addresses
                .into_iter()
                .map(|address| TriVector::from(address) - origin)
                .collect(),
        }
    }

    pub fn offsets(&self) -> &[TriVector] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Translate this shape onto an absolute anchor position. Fails on the
    /// first offset that doesn't land on a valid triangle address.
    pub fn place(
        &self,
        anchor: TriAddress,
    ) -> Result<Vec<TriAddress>, GridError> {
        self.offsets
            .iter()
            .map(|offset| anchor.translate(*offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    fn addr(a: i32, b: i32, c: i32) -> TriAddress {
        TriAddress::new(a, b, c).unwrap()
    }

    #[test]
    fn test_place() {
        // A north-pointing triangle plus the neighbour across its south edge
        let diamond = Footprint::new(vec![
            TriVector::default(),
            Direction::S.step(),
        ]);
        assert_eq!(
            diamond.place(addr(1, 1, 0)).unwrap(),
            vec![addr(1, 1, 0), addr(1, 0, 0)]
        );
        assert_eq!(
            diamond.place(addr(-3, 4, 1)).unwrap(),
            vec![addr(-3, 4, 1), addr(-3, 3, 1)]
        );

        // Wrong pointing for this shape
        assert_eq!(
            diamond.place(addr(1, 0, 0)).unwrap_err(),
            GridError::InvalidAddress { a: 1, b: -1, c: 0 }
        );
    }

    #[test]
    fn test_from_addresses() {
        let origin = addr(1, 1, 0);
        let shape = [origin, addr(1, 1, -1), addr(2, 0, -1)];
        let footprint = Footprint::from_addresses(origin, shape);
        assert_eq!(footprint.len(), 3);
        assert_eq!(footprint.offsets()[0], TriVector::default());
        // Placing on the original origin reproduces the original shape
        assert_eq!(footprint.place(origin).unwrap(), shape.to_vec());
    }

    #[test]
    fn test_place_at_coordinate_limit() {
        let footprint = Footprint::new(vec![Direction::SE.step()]);
        let anchor = addr(i32::MAX, i32::MIN, 2);
        assert_eq!(
            footprint.place(anchor).unwrap_err(),
            GridError::InvalidAddress {
                a: i32::MAX,
                b: i32::MIN,
                c: 2
            }
        );
    }
}
