use std::collections::HashSet;

/// Decides which indexes may be selected.
pub trait SelectionPolicy {
    fn is_valid_index(&self, _id: i32) -> bool {
        true
    }
}

/// Accepts every index.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyIndex;

impl SelectionPolicy for AnyIndex {}

/// Accepts `0..count`, e.g. the rows of a list.
#[derive(Debug, Clone, Copy)]
pub struct IndexBound {
    pub count: i32,
}

impl SelectionPolicy for IndexBound {
    fn is_valid_index(&self, id: i32) -> bool {
        (0..self.count).contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Cleared,
    ItemToggled { id: i32, on: bool },
    /// Always follows the specific event above.
    Changed,
}

type Observer = Box<dyn FnMut(&SelectionEvent)>;

/// Set of selected indexes that tells its observers about every change.
pub struct IndexedSelectionModel<P = AnyIndex> {
    policy: P,
    selected: HashSet<i32>,
    observers: Vec<Observer>,
}

impl<P: SelectionPolicy + Default> Default for IndexedSelectionModel<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: SelectionPolicy> IndexedSelectionModel<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            selected: HashSet::new(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SelectionEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn selected_items(&self) -> &HashSet<i32> {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_valid_index(&self, id: i32) -> bool {
        self.policy.is_valid_index(id)
    }

    /// Flips the selection state of `id` and returns the new state.
    ///
    /// Invalid indexes are ignored and reported as unselected.
    pub fn toggle_item(&mut self, id: i32) -> bool {
        if !self.policy.is_valid_index(id) {
            return false;
        }
        let on = if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id)
        };
        self.emit(SelectionEvent::ItemToggled { id, on });
        self.emit(SelectionEvent::Changed);
        on
    }

    pub fn clear(&mut self) {
        let had_selection = self.has_selection();
        self.selected.clear();
        if had_selection {
            self.emit(SelectionEvent::Cleared);
            self.emit(SelectionEvent::Changed);
        }
    }

    fn emit(&mut self, event: SelectionEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

#[cfg(test)]
fn recorder<P: SelectionPolicy>(
    model: &mut IndexedSelectionModel<P>,
) -> std::rc::Rc<std::cell::RefCell<Vec<SelectionEvent>>> {
    let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = events.clone();
    model.subscribe(move |e| sink.borrow_mut().push(*e));
    events
}

#[test]
fn toggle_emits_item_then_changed() {
    let mut model = IndexedSelectionModel::<AnyIndex>::default();
    let events = recorder(&mut model);

    assert!(model.toggle_item(4));
    assert!(model.has_selection());
    assert!(!model.toggle_item(4));
    assert!(!model.has_selection());

    assert_eq!(
        *events.borrow(),
        vec![
            SelectionEvent::ItemToggled { id: 4, on: true },
            SelectionEvent::Changed,
            SelectionEvent::ItemToggled { id: 4, on: false },
            SelectionEvent::Changed,
        ]
    );
}

#[test]
fn clear_is_silent_when_nothing_is_selected() {
    let mut model = IndexedSelectionModel::new(AnyIndex);
    let events = recorder(&mut model);

    model.clear();
    assert!(events.borrow().is_empty());

    model.toggle_item(1);
    model.toggle_item(2);
    events.borrow_mut().clear();

    model.clear();
    assert!(model.selected_items().is_empty());
    assert_eq!(*events.borrow(), vec![SelectionEvent::Cleared, SelectionEvent::Changed]);
}

#[test]
fn invalid_indexes_are_ignored() {
    let mut model = IndexedSelectionModel::new(IndexBound { count: 3 });
    let events = recorder(&mut model);

    assert!(!model.toggle_item(3));
    assert!(!model.toggle_item(-1));
    assert!(model.toggle_item(2));
    assert!(!model.is_valid_index(10));

    assert_eq!(model.selected_items().len(), 1);
    assert_eq!(events.borrow().len(), 2);
}
