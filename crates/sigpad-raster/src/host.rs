//! A host driven by hand, for headless embedding and tests.

use sigpad_core::{Host, Unsubscribe};
use std::cell::RefCell;
use std::rc::Rc;

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct HostState {
    device_pixel_ratio: Option<f64>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Host with a settable display scale factor and explicit resize dispatch.
/// Clones share state.
#[derive(Clone, Default)]
pub struct StaticHost(Rc<RefCell<HostState>>);

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_pixel_ratio(ratio: f64) -> Self {
        let host = Self::new();
        host.set_device_pixel_ratio(Some(ratio));
        host
    }

    pub fn set_device_pixel_ratio(&self, ratio: Option<f64>) {
        self.0.borrow_mut().device_pixel_ratio = ratio;
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    /// Deliver a viewport-resize notification to every listener.
    pub fn resize(&self) {
        let listeners: Vec<Listener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        log::trace!("dispatching resize to {} listeners", listeners.len());
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut callback) => (*callback)(),
                Err(_) => log::warn!("resize listener re-entered; skipped"),
            }
        }
    }
}

impl Host for StaticHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        self.0.borrow().device_pixel_ratio
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Unsubscribe {
        let id = {
            let mut state = self.0.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, Rc::new(RefCell::new(callback))));
            id
        };
        let state = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn resize_reaches_subscribers_until_unsubscribed() {
        let host = StaticHost::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let unsubscribe = host.on_resize(Box::new(move || counter.set(counter.get() + 1)));
        host.resize();
        host.resize();
        assert_eq!(hits.get(), 2);

        unsubscribe();
        host.resize();
        assert_eq!(hits.get(), 2);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn ratio_is_read_live() {
        let host = StaticHost::with_device_pixel_ratio(2.0);
        assert_eq!(host.device_pixel_ratio(), Some(2.0));
        host.set_device_pixel_ratio(None);
        assert_eq!(host.device_pixel_ratio(), None);
    }
}
