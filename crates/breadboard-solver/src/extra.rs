//! Extra-unknown bookkeeping for MNA assembly.
//!
//! Elements that contribute their own equation each get one unknown
//! appended after the node voltages. The order is fixed and shared between
//! assembly and result harvesting: voltage sources, then ammeters, then
//! op-amps, then logic gates, each class in component order. Misordering
//! here would misread branch currents.

use std::collections::HashMap;

use breadboard_core::{Component, ComponentKind};

#[derive(Debug, Clone)]
pub(crate) struct ExtraVars {
    index: HashMap<String, usize>,
    count: usize,
}

impl ExtraVars {
    /// Indexing for operating-point analysis: all four classes.
    pub fn operating_point(components: &[Component]) -> Self {
        Self::build(components, true)
    }

    /// Indexing for AC and transient analysis: sources and op-amps only.
    /// Ammeters and gates do not stamp in those regimes.
    pub fn small_signal(components: &[Component]) -> Self {
        Self::build(components, false)
    }

    fn build(components: &[Component], with_meters_and_gates: bool) -> Self {
        let mut index = HashMap::new();
        let mut count = 0;

        let mut claim = |id: &str| {
            index.insert(id.to_string(), count);
            count += 1;
        };

        for c in components {
            if c.kind.is_source() {
                claim(&c.id);
            }
        }
        if with_meters_and_gates {
            for c in components {
                if c.kind == ComponentKind::Ammeter {
                    claim(&c.id);
                }
            }
        }
        for c in components {
            if c.kind == ComponentKind::Opamp {
                claim(&c.id);
            }
        }
        if with_meters_and_gates {
            for c in components {
                if c.kind.is_gate() {
                    claim(&c.id);
                }
            }
        }

        Self { index, count }
    }

    /// Number of extra unknowns.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Extra-unknown index of a component, if it has one.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, kind: ComponentKind) -> Component {
        Component::new(id, kind, 1.0)
    }

    #[test]
    fn test_operating_point_order() {
        let components = vec![
            part("gate", ComponentKind::AndGate),
            part("op", ComponentKind::Opamp),
            part("amm", ComponentKind::Ammeter),
            part("v2", ComponentKind::AcSource),
            part("r", ComponentKind::Resistor),
            part("v1", ComponentKind::VoltageSource),
        ];
        let vars = ExtraVars::operating_point(&components);

        assert_eq!(vars.count(), 5);
        // Sources first, in component order.
        assert_eq!(vars.index_of("v2"), Some(0));
        assert_eq!(vars.index_of("v1"), Some(1));
        // Then meters, op-amps, gates.
        assert_eq!(vars.index_of("amm"), Some(2));
        assert_eq!(vars.index_of("op"), Some(3));
        assert_eq!(vars.index_of("gate"), Some(4));
        assert_eq!(vars.index_of("r"), None);
    }

    #[test]
    fn test_small_signal_skips_meters_and_gates() {
        let components = vec![
            part("v1", ComponentKind::VoltageSource),
            part("amm", ComponentKind::Ammeter),
            part("op", ComponentKind::Opamp),
            part("gate", ComponentKind::NorGate),
        ];
        let vars = ExtraVars::small_signal(&components);

        assert_eq!(vars.count(), 2);
        assert_eq!(vars.index_of("v1"), Some(0));
        assert_eq!(vars.index_of("op"), Some(1));
        assert_eq!(vars.index_of("amm"), None);
        assert_eq!(vars.index_of("gate"), None);
    }
}
