//! Modified Nodal Analysis (MNA) matrix structures.

use nalgebra::{DMatrix, DVector};

/// Real-valued MNA system: G·x = b.
///
/// Rows/columns `0..num_nodes` are node voltages (node n sits at row n-1;
/// ground is not in the matrix). Rows `num_nodes..size` are extra unknowns,
/// one per element that contributes its own equation: independent voltage
/// sources, ammeters, op-amps and, in operating-point analysis, logic gates.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Number of extra (branch-current) unknowns.
    pub num_extra: usize,
}

impl MnaSystem {
    /// Create a zeroed system for `num_nodes` nodes and `num_extra` extra
    /// unknowns.
    pub fn new(num_nodes: usize, num_extra: usize) -> Self {
        let size = num_nodes + num_extra;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            num_nodes,
            num_extra,
        }
    }

    /// Total system size (nodes + extra unknowns).
    pub fn size(&self) -> usize {
        self.num_nodes + self.num_extra
    }

    /// Matrix row of an extra unknown.
    pub fn extra_row(&self, extra_idx: usize) -> usize {
        self.num_nodes + extra_idx
    }

    /// Add a value to the coefficient matrix at (row, col).
    pub fn add_element(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[(row, col)] += value;
    }

    /// Add a value to the RHS vector at the given row.
    pub fn add_rhs(&mut self, row: usize, value: f64) {
        self.rhs[row] += value;
    }

    /// Stamp a conductance between two nodes.
    ///
    /// For a conductance G between matrix indices i and j:
    /// - G[i,i] += G, G[j,j] += G
    /// - G[i,j] -= G, G[j,i] -= G
    ///
    /// `None` stands for ground, whose row/column does not exist.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp a current source driving `current` amperes from node i to node j
    /// (positive current leaves i and enters j).
    pub fn stamp_current_source(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        current: f64,
    ) {
        if let Some(i) = node_i {
            self.rhs[i] -= current;
        }
        if let Some(j) = node_j {
            self.rhs[j] += current;
        }
    }

    /// Stamp a voltage source V(pos) - V(neg) = voltage.
    ///
    /// `extra_idx` selects the source's extra unknown, whose solution is the
    /// branch current through the source.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        extra_idx: usize,
        voltage: f64,
    ) {
        let row = self.num_nodes + extra_idx;

        if let Some(i) = node_pos {
            self.matrix[(i, row)] += 1.0;
            self.matrix[(row, i)] += 1.0;
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] -= 1.0;
            self.matrix[(row, j)] -= 1.0;
        }

        self.rhs[row] += voltage;
    }

    /// Get a reference to the coefficient matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Get a reference to the RHS vector.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Get a mutable reference to the RHS vector.
    pub fn rhs_mut(&mut self) -> &mut DVector<f64> {
        &mut self.rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_system() {
        let sys = MnaSystem::new(3, 2);
        assert_eq!(sys.size(), 5);
        assert_eq!(sys.extra_row(1), 4);
    }

    #[test]
    fn test_stamp_conductance() {
        let mut sys = MnaSystem::new(2, 0);
        sys.stamp_conductance(Some(0), Some(1), 1.0);

        assert_eq!(sys.matrix()[(0, 0)], 1.0);
        assert_eq!(sys.matrix()[(1, 1)], 1.0);
        assert_eq!(sys.matrix()[(0, 1)], -1.0);
        assert_eq!(sys.matrix()[(1, 0)], -1.0);
    }

    #[test]
    fn test_stamp_conductance_to_ground() {
        let mut sys = MnaSystem::new(2, 0);
        sys.stamp_conductance(Some(0), None, 1.0);

        assert_eq!(sys.matrix()[(0, 0)], 1.0);
        assert_eq!(sys.matrix()[(1, 1)], 0.0);
    }

    #[test]
    fn test_stamp_current_source() {
        let mut sys = MnaSystem::new(2, 0);
        sys.stamp_current_source(None, Some(0), 1.0);

        assert_eq!(sys.rhs()[0], 1.0);
        assert_eq!(sys.rhs()[1], 0.0);
    }

    #[test]
    fn test_stamp_voltage_source() {
        let mut sys = MnaSystem::new(2, 1);
        sys.stamp_voltage_source(Some(0), None, 0, 5.0);

        assert_eq!(sys.matrix()[(0, 2)], 1.0);
        assert_eq!(sys.matrix()[(2, 0)], 1.0);
        assert_eq!(sys.rhs()[2], 5.0);
    }
}
