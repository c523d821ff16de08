//! Outbound command seam between widgets and the transport.

/// Receives user-initiated control changes as `(topic, value)` pairs.
///
/// Supplied at dashboard construction and called synchronously from
/// interaction handlers. Delivery, retries, and persistence are entirely
/// the implementor's concern; the engine fires and forgets, and displayed
/// state only changes when the update comes back over the inbound path.
pub trait CommandSink {
    fn send(&self, topic: &str, value: &str);
}

/// Plain closures work as sinks: `|topic, value| …`.
impl<F> CommandSink for F
where
    F: Fn(&str, &str),
{
    fn send(&self, topic: &str, value: &str) {
        self(topic, value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn closures_are_sinks() {
        let sent = RefCell::new(Vec::new());
        let sink = |topic: &str, value: &str| {
            sent.borrow_mut().push((topic.to_owned(), value.to_owned()));
        };
        sink.send("home/kitchen/oven_1/power", "on");
        assert_eq!(
            sent.into_inner(),
            [("home/kitchen/oven_1/power".to_owned(), "on".to_owned())]
        );
    }
}
