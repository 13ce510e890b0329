//! Policy knobs for conformance checks.

/// Options that change how type references relate.
///
/// The default is the strict rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckPolicy {
    /// When set, a candidate parameter typed `any` accepts every contract
    /// parameter type, nullable or not. When unset, an `any` candidate
    /// parameter only satisfies an `any` contract parameter.
    pub widen_any_parameters: bool,
}

impl CheckPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_widen_any_parameters(mut self, widen: bool) -> Self {
        self.widen_any_parameters = widen;
        self
    }
}
