/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Clock whose time is set by hand; shared through `Rc` so a test can
/// advance it while the engine holds it.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct ManualClock(pub std::rc::Rc<std::cell::Cell<f64>>);

#[cfg(test)]
impl ManualClock {
    pub fn at(ms: f64) -> Self {
        Self(std::rc::Rc::new(std::cell::Cell::new(ms)))
    }

    pub fn set(&self, ms: f64) {
        self.0.set(ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}
