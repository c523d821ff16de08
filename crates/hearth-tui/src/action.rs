//! All possible UI actions. Actions are the sole mechanism for state mutation.

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ───────────────────────────────────────────────────
    ToggleHelp,

    // ── Bus traffic ────────────────────────────────────────────────
    /// One inbound topic update, in arrival order. The only way widget
    /// state ever changes — user interactions come back through here.
    BusUpdate { topic: String, payload: String },

    // ── Connection status ──────────────────────────────────────────
    Connected,
    Disconnected,
}
