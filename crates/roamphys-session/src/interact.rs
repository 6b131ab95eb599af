use roamphys_core::types::{Scalar, Vec3};

/// What happens when an interactable is triggered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InteractionKind {
    /// Toggle the vehicle trunk.
    Trunk,
    /// Only reported as an event.
    Notify,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interactable {
    pub position: Vec3,
    pub radius: Scalar,
    pub label: String,
    pub kind: InteractionKind,
}

/// Point interactables; the nearest one in range is focused.
#[derive(Clone, Debug, Default)]
pub struct Interactions {
    items: Vec<Interactable>,
    focused: Option<usize>,
}

impl Interactions {
    pub fn add(&mut self, item: Interactable) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    #[inline] pub fn get(&self, index: usize) -> Option<&Interactable> { self.items.get(index) }
    #[inline] pub fn len(&self) -> usize { self.items.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.items.is_empty() }
    #[inline] pub fn focused(&self) -> Option<usize> { self.focused }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        if let Some(item) = self.items.get_mut(index) { item.position = position; }
    }

    /// Refocus on the nearest item strictly inside its radius.
    pub fn update(&mut self, from: Vec3) -> Option<usize> {
        self.focused = self.items.iter().enumerate()
            .map(|(i, it)| (i, it.position.distance(from), it.radius))
            .filter(|&(_, d, r)| d < r)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _, _)| i);
        self.focused
    }

    pub fn clear_focus(&mut self) { self.focused = None; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_core::vec3;

    fn item(x: f32, r: f32) -> Interactable {
        Interactable { position: vec3(x, 0.0, 0.0), radius: r, label: format!("at {x}"), kind: InteractionKind::Notify }
    }

    #[test]
    fn nearest_in_range_wins() {
        let mut set = Interactions::default();
        set.add(item(0.0, 3.0));
        let near = set.add(item(2.0, 1.5));
        assert_eq!(set.update(vec3(1.5, 0.0, 0.0)), Some(near));
        assert_eq!(set.update(vec3(-1.0, 0.0, 0.0)), Some(0));
        assert_eq!(set.update(vec3(10.0, 0.0, 0.0)), None);
    }

    #[test]
    fn radius_is_exclusive() {
        let mut set = Interactions::default();
        set.add(item(0.0, 3.0));
        assert_eq!(set.update(vec3(3.0, 0.0, 0.0)), None);
    }
}
