use serde::{Deserialize, Serialize};

/// Material catalog is fixed; pair lookups are symmetric.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialId {
    #[default]
    Default,
    Ground,
    Wheel,
    Character,
}

/// Single-material properties used when a pair has no explicit entry.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatProps {
    pub friction: f32,
    pub restitution: f32,
}

/// What the solver (and the wheel model) uses for a contact between two materials.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatPairProps {
    pub friction: f32,
    pub restitution: f32,
}

pub fn props(id: MaterialId) -> MatProps {
    use MaterialId::*;
    match id {
        Default   => MatProps { friction: 0.5, restitution: 0.1 },
        Ground    => MatProps { friction: 0.5, restitution: 0.1 },
        Wheel     => MatProps { friction: 0.8, restitution: 0.0 },
        Character => MatProps { friction: 0.0, restitution: 0.0 },
    }
}

fn mix_pair(a: MatProps, b: MatProps) -> MatPairProps {
    MatPairProps {
        friction: (a.friction * b.friction).abs().sqrt(),
        restitution: a.restitution.max(b.restitution),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairEntry {
    pub a: MaterialId,
    pub b: MaterialId,
    pub props: MatPairProps,
}

/// Per-pair contact table. Explicit entries win; other pairs mix the single-material
/// properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMaterialTable {
    pub entries: Vec<PairEntry>,
}

impl Default for ContactMaterialTable {
    fn default() -> Self {
        let mut t = Self { entries: Vec::new() };
        t.set(MaterialId::Wheel, MaterialId::Ground, MatPairProps { friction: 0.8, restitution: 0.0 });
        t.set(MaterialId::Default, MaterialId::Ground, MatPairProps { friction: 0.5, restitution: 0.1 });
        t.set(MaterialId::Character, MaterialId::Ground, MatPairProps { friction: 0.0, restitution: 0.0 });
        t
    }
}

impl ContactMaterialTable {
    pub fn empty() -> Self { Self { entries: Vec::new() } }

    /// Insert or replace the entry for the unordered pair (a, b).
    pub fn set(&mut self, a: MaterialId, b: MaterialId, props: MatPairProps) {
        match self.entries.iter_mut().find(|e| same_pair(e, a, b)) {
            Some(e) => e.props = props,
            None => self.entries.push(PairEntry { a, b, props }),
        }
    }

    pub fn pair(&self, a: MaterialId, b: MaterialId) -> MatPairProps {
        self.entries
            .iter()
            .find(|e| same_pair(e, a, b))
            .map(|e| e.props)
            .unwrap_or_else(|| mix_pair(props(a), props(b)))
    }
}

#[inline]
fn same_pair(e: &PairEntry, a: MaterialId, b: MaterialId) -> bool {
    (e.a == a && e.b == b) || (e.a == b && e.b == a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use MaterialId::*;

    #[test] fn symmetry() {
        let t = ContactMaterialTable::default();
        for a in [Default, Ground, Wheel, Character] {
            for b in [Default, Ground, Wheel, Character] {
                assert_eq!(t.pair(a, b), t.pair(b, a));
            }
        }
    }

    #[test] fn reference_pairs() {
        let t = ContactMaterialTable::default();
        let wg = t.pair(Ground, Wheel);
        assert_eq!((wg.friction, wg.restitution), (0.8, 0.0));
        let dg = t.pair(Default, Ground);
        assert_eq!((dg.friction, dg.restitution), (0.5, 0.1));
        let dd = t.pair(Default, Default);
        assert_eq!((dd.friction, dd.restitution), (0.5, 0.1));
    }

    #[test] fn set_replaces_unordered() {
        let mut t = ContactMaterialTable::default();
        let n = t.entries.len();
        t.set(Ground, Wheel, MatPairProps { friction: 1.2, restitution: 0.0 });
        assert_eq!(t.entries.len(), n);
        assert_eq!(t.pair(Wheel, Ground).friction, 1.2);
    }

    #[test] fn table_from_json() {
        let t: ContactMaterialTable = serde_json::from_str(
            r#"{"entries":[{"a":"wheel","b":"ground","props":{"friction":0.9,"restitution":0.0}}]}"#,
        ).unwrap();
        assert_eq!(t.pair(Ground, Wheel).friction, 0.9);
    }
}
