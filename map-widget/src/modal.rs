//! Companion modal dialog opened and closed on behalf of the host page.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::css;
use crate::error::WidgetError;
use crate::platform::{HostDocument, HostElement, Scheduler};

/// Delay between opening the modal and moving the focus into it, so that the dialog is
/// displayed by then.
pub const FOCUS_DELAY: Duration = Duration::from_millis(100);

/// Visibility of a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    /// The dialog is displayed.
    Open,
    /// The dialog is hidden.
    Closed,
}

/// Reference to the modal dialog of a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalTarget<E> {
    /// Element looked up by id each time it is needed, so the host page may replace it.
    Id(String),
    /// Element handed over by the host page.
    Element(E),
}

impl<E: HostElement> ModalTarget<E> {
    /// Finds the modal element in the document.
    pub fn resolve<D>(&self, document: &D) -> Result<E, WidgetError>
    where
        D: HostDocument<Element = E>,
    {
        match self {
            Self::Id(id) => document
                .element_by_id(id)
                .ok_or_else(|| WidgetError::ModalTargetMissing(id.clone())),
            Self::Element(element) if element.is_connected() => Ok(element.clone()),
            Self::Element(element) => Err(WidgetError::ModalTargetMissing(
                element.id().unwrap_or_default(),
            )),
        }
    }
}

/// Opens and closes modal dialogs of the host document.
///
/// An open modal has the `is-open` class and `aria-hidden="false"`. Closing it removes the class,
/// sets `aria-hidden="true"` and gives the focus back to the element that had it before opening.
pub struct ModalController<D: HostDocument> {
    document: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    return_focus: RefCell<Vec<(D::Element, D::Element)>>,
}

impl<D: HostDocument> ModalController<D> {
    /// Creates a controller for modals of the document.
    pub fn new(document: Rc<D>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            document,
            scheduler,
            return_focus: RefCell::new(vec![]),
        }
    }

    /// Current state of the modal with the given id, or `None` if it is not in the document.
    pub fn state(&self, modal_id: &str) -> Option<ModalState> {
        self.target_state(&ModalTarget::Id(modal_id.to_string()))
    }

    /// Current state of the modal, or `None` if it is not in the document.
    pub fn target_state(&self, target: &ModalTarget<D::Element>) -> Option<ModalState> {
        let modal = target.resolve(&*self.document).ok()?;
        Some(if modal.has_class(css::MODAL_OPEN) {
            ModalState::Open
        } else {
            ModalState::Closed
        })
    }

    /// Opens the modal with the given id. See [`ModalController::open_target`].
    pub fn open(&self, modal_id: &str) -> Result<(), WidgetError> {
        self.open_target(&ModalTarget::Id(modal_id.to_string()))
    }

    /// Closes the modal with the given id. See [`ModalController::close_target`].
    pub fn close(&self, modal_id: &str) -> Result<(), WidgetError> {
        self.close_target(&ModalTarget::Id(modal_id.to_string()))
    }

    fn take_return_focus(&self, modal: &D::Element) -> Option<D::Element> {
        let mut return_focus = self.return_focus.borrow_mut();
        let index = return_focus.iter().position(|(m, _)| m == modal)?;
        Some(return_focus.remove(index).1)
    }

    /// Opens the modal and moves the focus to its first focusable element after [`FOCUS_DELAY`].
    pub fn open_target(&self, target: &ModalTarget<D::Element>) -> Result<(), WidgetError> {
        let modal = target.resolve(&*self.document)?;

        if !modal.has_class(css::MODAL_OPEN) {
            self.take_return_focus(&modal);
            if let Some(active) = self.document.active_element() {
                self.return_focus
                    .borrow_mut()
                    .push((modal.clone(), active));
            }
        }

        modal.add_class(css::MODAL_OPEN);
        modal.set_attribute(css::ARIA_HIDDEN, "false");
        log::debug!("Opened modal {:?}", modal.id());

        self.scheduler.defer(
            FOCUS_DELAY,
            Box::new(move || {
                if !modal.is_connected() || !modal.has_class(css::MODAL_OPEN) {
                    return;
                }

                if let Some(target) = modal.first_focusable() {
                    target.focus();
                }
            }),
        );

        Ok(())
    }

    /// Closes the modal and restores the focus saved when it was opened.
    pub fn close_target(&self, target: &ModalTarget<D::Element>) -> Result<(), WidgetError> {
        let modal = target.resolve(&*self.document)?;

        modal.remove_class(css::MODAL_OPEN);
        modal.set_attribute(css::ARIA_HIDDEN, "true");
        log::debug!("Closed modal {:?}", modal.id());

        if let Some(previous) = self
            .take_return_focus(&modal)
            .filter(HostElement::is_connected)
        {
            previous.focus();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessDocument, HeadlessElement, ManualScheduler};

    struct Fixture {
        document: Rc<HeadlessDocument>,
        scheduler: Rc<ManualScheduler>,
        controller: ModalController<HeadlessDocument>,
        trigger: HeadlessElement,
        close_button: HeadlessElement,
    }

    fn fixture() -> Fixture {
        let document = Rc::new(HeadlessDocument::new());
        let scheduler = Rc::new(ManualScheduler::new());

        let trigger = document.create_element("button");
        document.body().append(&trigger);

        let modal = document.create_element("div");
        modal.set_id("details");
        modal.set_attribute(css::ARIA_HIDDEN, "true");
        let title = document.create_element("h2");
        let close_button = document.create_element("button");
        modal.append(&title);
        modal.append(&close_button);
        document.body().append(&modal);

        let controller = ModalController::new(document.clone(), scheduler.clone());
        Fixture {
            document,
            scheduler,
            controller,
            trigger,
            close_button,
        }
    }

    #[test]
    fn open_sets_state_and_focuses_after_delay() {
        let f = fixture();
        f.trigger.focus();

        f.controller.open("details").expect("modal exists");
        let modal = f.document.element_by_id("details").expect("modal exists");
        assert!(modal.has_class(css::MODAL_OPEN));
        assert_eq!(modal.attribute(css::ARIA_HIDDEN).as_deref(), Some("false"));
        assert_eq!(f.controller.state("details"), Some(ModalState::Open));

        assert!(f.trigger.is_focused());
        f.scheduler.advance(FOCUS_DELAY);
        assert!(f.close_button.is_focused());
    }

    #[test]
    fn close_restores_focus() {
        let f = fixture();
        f.trigger.focus();
        f.controller.open("details").expect("modal exists");
        f.scheduler.run_pending();

        f.controller.close("details").expect("modal exists");
        let modal = f.document.element_by_id("details").expect("modal exists");
        assert!(!modal.has_class(css::MODAL_OPEN));
        assert_eq!(modal.attribute(css::ARIA_HIDDEN).as_deref(), Some("true"));
        assert!(f.trigger.is_focused());
    }

    #[test]
    fn close_before_focus_delay_keeps_focus_outside() {
        let f = fixture();
        f.trigger.focus();
        f.controller.open("details").expect("modal exists");
        f.controller.close("details").expect("modal exists");

        f.scheduler.run_pending();
        assert!(f.trigger.is_focused());
        assert!(!f.close_button.is_focused());
    }

    #[test]
    fn removed_modal_is_not_focused() {
        let f = fixture();
        f.controller.open("details").expect("modal exists");
        let modal = f.document.element_by_id("details").expect("modal exists");
        modal.remove();

        f.scheduler.run_pending();
        assert!(!f.close_button.is_focused());
    }

    #[test]
    fn repeated_cycles_end_closed() {
        let f = fixture();
        f.trigger.focus();
        for _ in 0..5 {
            f.controller.open("details").expect("modal exists");
            f.controller.open("details").expect("modal exists");
            f.scheduler.run_pending();
            f.controller.close("details").expect("modal exists");
        }

        assert_eq!(f.controller.state("details"), Some(ModalState::Closed));
        let modal = f.document.element_by_id("details").expect("modal exists");
        assert_eq!(
            modal
                .classes()
                .iter()
                .filter(|class| *class == css::MODAL_OPEN)
                .count(),
            0
        );
        assert!(f.trigger.is_focused());
    }

    #[test]
    fn element_target() {
        let f = fixture();
        let modal = f.document.element_by_id("details").expect("modal exists");
        let target = ModalTarget::Element(modal.clone());
        f.trigger.focus();

        f.controller.open_target(&target).expect("modal connected");
        assert_eq!(f.controller.target_state(&target), Some(ModalState::Open));
        f.scheduler.run_pending();
        assert!(f.close_button.is_focused());

        f.controller.close_target(&target).expect("modal connected");
        assert_eq!(f.controller.state("details"), Some(ModalState::Closed));
        assert!(f.trigger.is_focused());

        modal.remove();
        assert_eq!(
            f.controller.open_target(&target),
            Err(WidgetError::ModalTargetMissing("details".to_string()))
        );
    }

    #[test]
    fn missing_modal() {
        let f = fixture();
        assert_eq!(
            f.controller.open("nope"),
            Err(WidgetError::ModalTargetMissing("nope".to_string()))
        );
        assert_eq!(
            f.controller.close("nope"),
            Err(WidgetError::ModalTargetMissing("nope".to_string()))
        );
        assert_eq!(f.controller.state("nope"), None);
        assert_eq!(f.scheduler.pending(), 0);
    }
}
