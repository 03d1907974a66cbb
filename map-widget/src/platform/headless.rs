//! In-memory host environment.
//!
//! [`HeadlessDocument`] is a minimal element tree with attributes, classes, inline styles and
//! focus tracking, and [`ManualScheduler`] runs deferred tasks on a simulated clock. Together they
//! allow driving the widget without a browser.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use map_widget_types::cartesian::Size;

use super::{HostDocument, HostElement, Scheduler, Task};

const FOCUSABLE_TAGS: &[&str] = &["button", "input", "select", "textarea"];

type NodeRef = Rc<RefCell<Node>>;
type FocusSlot = Rc<RefCell<Weak<RefCell<Node>>>>;

#[derive(Clone)]
struct FocusListener(Rc<dyn Fn()>);

impl std::fmt::Debug for FocusListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FocusListener")
    }
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    style: BTreeMap<String, String>,
    size: Size,
    parent: Weak<RefCell<Node>>,
    children: Vec<NodeRef>,
    is_root: bool,
    focus_listeners: Vec<FocusListener>,
}

impl Node {
    fn is_focusable(&self) -> bool {
        FOCUSABLE_TAGS.contains(&self.tag.as_str())
            || self.attributes.contains_key("href")
            || self
                .attributes
                .get("tabindex")
                .is_some_and(|index| index.trim() != "-1")
    }
}

fn find_descendant(node: &NodeRef, predicate: &dyn Fn(&Node) -> bool) -> Option<NodeRef> {
    for child in &node.borrow().children {
        if predicate(&child.borrow()) {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant(child, predicate) {
            return Some(found);
        }
    }

    None
}

/// Element of a [`HeadlessDocument`].
#[derive(Clone)]
pub struct HeadlessElement {
    node: NodeRef,
    focus: FocusSlot,
}

impl std::fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("HeadlessElement")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("classes", &node.classes)
            .finish()
    }
}

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl HeadlessElement {
    fn wrap(&self, node: NodeRef) -> Self {
        Self {
            node,
            focus: self.focus.clone(),
        }
    }

    /// Tag name.
    pub fn tag(&self) -> String {
        self.node.borrow().tag.clone()
    }

    /// Sets the `id` attribute.
    pub fn set_id(&self, id: &str) {
        self.set_attribute("id", id);
    }

    /// Sets the attribute and returns the element, for building trees in one expression.
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Moves `child` under this element. The child is detached from its previous parent first.
    pub fn append(&self, child: &HeadlessElement) {
        child.remove();
        child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        self.node.borrow_mut().children.push(child.node.clone());
    }

    /// Children in document order.
    pub fn children(&self) -> Vec<HeadlessElement> {
        self.node
            .borrow()
            .children
            .iter()
            .map(|child| self.wrap(child.clone()))
            .collect()
    }

    /// CSS classes in the order they were added.
    pub fn classes(&self) -> Vec<String> {
        self.node.borrow().classes.clone()
    }

    /// Text content.
    pub fn text(&self) -> String {
        self.node.borrow().text.clone()
    }

    /// Sets the size reported by [`HostElement::client_size`], as if the layout changed.
    pub fn set_client_size(&self, size: Size) {
        self.node.borrow_mut().size = size;
    }

    /// Registers a function called every time the element receives focus, like a `focus` event
    /// handler of a page script.
    pub fn on_focus(&self, listener: impl Fn() + 'static) {
        self.node
            .borrow_mut()
            .focus_listeners
            .push(FocusListener(Rc::new(listener)));
    }

    /// Whether the element has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focus
            .borrow()
            .upgrade()
            .is_some_and(|focused| Rc::ptr_eq(&focused, &self.node))
    }
}

impl HostElement for HeadlessElement {
    fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    fn is_connected(&self) -> bool {
        let mut current = self.node.clone();
        loop {
            let parent = current.borrow().parent.upgrade();
            match parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        let is_root = current.borrow().is_root;
        is_root
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.node
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.node.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.node.borrow_mut().classes.retain(|c| c != class);
    }

    fn set_text(&self, text: &str) {
        self.node.borrow_mut().text = text.to_string();
    }

    fn style(&self, property: &str) -> Option<String> {
        self.node.borrow().style.get(property).cloned()
    }

    fn set_style(&self, property: &str, value: Option<&str>) {
        let mut node = self.node.borrow_mut();
        match value {
            Some(value) => {
                node.style.insert(property.to_string(), value.to_string());
            }
            None => {
                node.style.remove(property);
            }
        }
    }

    fn client_size(&self) -> Size {
        self.node.borrow().size
    }

    fn focus(&self) {
        *self.focus.borrow_mut() = Rc::downgrade(&self.node);

        let listeners = self.node.borrow().focus_listeners.clone();
        for FocusListener(listener) in listeners {
            listener();
        }
    }

    fn find_by_attribute(&self, name: &str, value: &str) -> Option<Self> {
        find_descendant(&self.node, &|node| {
            node.attributes.get(name).is_some_and(|v| v == value)
        })
        .map(|node| self.wrap(node))
    }

    fn first_focusable(&self) -> Option<Self> {
        find_descendant(&self.node, &Node::is_focusable).map(|node| self.wrap(node))
    }

    fn append_child(&self, tag: &str, class: &str) -> Option<Self> {
        let child = self.wrap(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Default::default()
        })));
        child.add_class(class);
        self.append(&child);
        Some(child)
    }

    fn remove(&self) {
        let parent = self.node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, &self.node));
        }
        self.node.borrow_mut().parent = Weak::new();
    }
}

/// In-memory document.
pub struct HeadlessDocument {
    body: HeadlessElement,
    loading: Cell<bool>,
    ready_tasks: RefCell<Vec<Task>>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Creates a document that has finished loading.
    pub fn new() -> Self {
        let body = HeadlessElement {
            node: Rc::new(RefCell::new(Node {
                tag: "body".to_string(),
                is_root: true,
                ..Default::default()
            })),
            focus: Rc::new(RefCell::new(Weak::new())),
        };

        Self {
            body,
            loading: Cell::new(false),
            ready_tasks: RefCell::new(vec![]),
        }
    }

    /// Creates a document that is still loading. Call [`HeadlessDocument::finish_loading`] to
    /// make it ready.
    pub fn loading() -> Self {
        let document = Self::new();
        document.loading.set(true);
        document
    }

    /// Root element of the document.
    pub fn body(&self) -> HeadlessElement {
        self.body.clone()
    }

    /// Creates an element that is not attached to the document yet.
    pub fn create_element(&self, tag: &str) -> HeadlessElement {
        self.body.wrap(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Default::default()
        })))
    }

    /// Marks the document as ready and runs the tasks waiting for it.
    pub fn finish_loading(&self) {
        self.loading.set(false);
        let tasks = std::mem::take(&mut *self.ready_tasks.borrow_mut());
        for task in tasks {
            task();
        }
    }
}

impl HostDocument for HeadlessDocument {
    type Element = HeadlessElement;

    fn is_loading(&self) -> bool {
        self.loading.get()
    }

    fn on_ready(&self, task: Task) {
        if self.is_loading() {
            self.ready_tasks.borrow_mut().push(task);
        } else {
            task();
        }
    }

    fn element_by_id(&self, id: &str) -> Option<HeadlessElement> {
        self.body.find_by_attribute("id", id)
    }

    fn active_element(&self) -> Option<HeadlessElement> {
        let focused = self.body.focus.borrow().upgrade()?;
        Some(self.body.wrap(focused))
    }
}

/// Scheduler running deferred tasks on a simulated clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    queue: RefCell<Vec<(Duration, Task)>>,
}

impl ManualScheduler {
    /// Creates a scheduler with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn take_next(&self, deadline: Option<Duration>) -> Option<(Duration, Task)> {
        let mut queue = self.queue.borrow_mut();
        let (index, _) = queue
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| deadline.map_or(true, |deadline| *due <= deadline))
            .min_by_key(|(_, (due, _))| *due)?;
        Some(queue.remove(index))
    }

    /// Moves the clock forward, running every task that becomes due, including tasks scheduled by
    /// other tasks. Returns the number of executed tasks.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now.get() + by;
        let mut count = 0;
        while let Some((due, task)) = self.take_next(Some(deadline)) {
            self.now.set(due.max(self.now.get()));
            task();
            count += 1;
        }
        self.now.set(deadline);
        count
    }

    /// Runs all tasks, advancing the clock as far as needed. Returns the number of executed tasks.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Some((due, task)) = self.take_next(None) {
            self.now.set(due.max(self.now.get()));
            task();
            count += 1;
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay: Duration, task: Task) {
        self.queue
            .borrow_mut()
            .push((self.now.get() + delay, task));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn element_tree() {
        let document = HeadlessDocument::new();
        let container = document.create_element("div");
        container.set_id("map");
        assert!(!container.is_connected());
        assert!(document.element_by_id("map").is_none());

        document.body().append(&container);
        assert!(container.is_connected());
        assert_eq!(document.element_by_id("map"), Some(container.clone()));

        let pane = container
            .append_child("div", "pane")
            .expect("child created");
        assert!(pane.is_connected());
        assert!(pane.has_class("pane"));

        container.remove();
        assert!(!pane.is_connected());
        assert!(document.element_by_id("map").is_none());
    }

    #[test]
    fn classes_are_unique() {
        let document = HeadlessDocument::new();
        let element = document.create_element("div");
        element.add_class("is-open");
        element.add_class("is-open");
        assert_eq!(element.classes(), vec!["is-open".to_string()]);
        element.remove_class("is-open");
        element.remove_class("is-open");
        assert!(element.classes().is_empty());
    }

    #[test]
    fn styles() {
        let document = HeadlessDocument::new();
        let element = document.create_element("div");
        element.set_style("filter", Some("grayscale(100%)"));
        assert_eq!(element.style("filter").as_deref(), Some("grayscale(100%)"));
        element.set_style("filter", None);
        assert_eq!(element.style("filter"), None);
    }

    #[test]
    fn first_focusable() {
        let document = HeadlessDocument::new();
        let dialog = document.create_element("div");
        let heading = document.create_element("h2");
        let skipped = document.create_element("div").with_attribute("tabindex", "-1");
        let wrapper = document.create_element("p");
        let link = document.create_element("a").with_attribute("href", "#details");
        let button = document.create_element("button");

        dialog.append(&heading);
        dialog.append(&skipped);
        dialog.append(&wrapper);
        wrapper.append(&link);
        dialog.append(&button);

        assert_eq!(dialog.first_focusable(), Some(link));

        let plain = document.create_element("div");
        plain.append(&document.create_element("span"));
        assert_eq!(plain.first_focusable(), None);
    }

    #[test]
    fn focus_tracking() {
        let document = HeadlessDocument::new();
        let first = document.create_element("button");
        let second = document.create_element("button");
        document.body().append(&first);
        document.body().append(&second);

        first.focus();
        assert!(first.is_focused());
        second.focus();
        assert!(!first.is_focused());
        assert_eq!(document.active_element(), Some(second));
    }

    #[test]
    fn focus_listeners_run_after_focus_moves() {
        let document = Rc::new(HeadlessDocument::new());
        let button = document.create_element("button");
        document.body().append(&button);

        let calls = Rc::new(Cell::new(0));
        button.on_focus({
            let document = document.clone();
            let calls = calls.clone();
            move || {
                assert!(document.active_element().is_some());
                calls.set(calls.get() + 1);
            }
        });

        button.focus();
        button.focus();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn ready_tasks_run_once() {
        let document = HeadlessDocument::loading();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        document.on_ready(Box::new(move || counter.set(counter.get() + 1)));
        assert_eq!(calls.get(), 0);

        document.finish_loading();
        document.finish_loading();
        assert_eq!(calls.get(), 1);

        let counter = calls.clone();
        document.on_ready(Box::new(move || counter.set(counter.get() + 1)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn scheduler_runs_in_due_order() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(vec![]));

        for (name, delay) in [("late", 200), ("early", 50), ("middle", 100)] {
            let log = log.clone();
            scheduler.defer(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        assert_eq!(scheduler.advance(Duration::from_millis(100)), 2);
        assert_eq!(*log.borrow(), vec!["early", "middle"]);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*log.borrow(), vec!["early", "middle", "late"]);
    }

    #[test]
    fn tasks_may_schedule_tasks() {
        let scheduler = Rc::new(ManualScheduler::new());
        let calls = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let counter = calls.clone();
        scheduler.defer(
            Duration::from_millis(10),
            Box::new(move || {
                counter.set(counter.get() + 1);
                let counter = counter.clone();
                inner_scheduler.defer(
                    Duration::from_millis(10),
                    Box::new(move || counter.set(counter.get() + 1)),
                );
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(15)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(5)), 1);
        assert_eq!(calls.get(), 2);
    }
}
