//! Lifecycle hook call-outs.
//!
//! Hooks are simple call-outs around the two phases an application goes
//! through: building (`pre_init`/`post_init`, around [`AppBuilder::build`])
//! and executing a command (`pre_execute`/`post_execute`, around the
//! action). They are not part of the parsing core.
//!
//! [`AppBuilder::build`]: crate::AppBuilder::build

use std::rc::Rc;

use crate::invocation::Invocation;

pub(crate) type SetupHook = Rc<dyn Fn()>;
pub(crate) type RunHook = Rc<dyn Fn(&Invocation<'_>) -> anyhow::Result<()>>;

/// The registered hook call-outs for an application.
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) pre_init: Option<SetupHook>,
    pub(crate) post_init: Option<SetupHook>,
    pub(crate) pre_execute: Option<RunHook>,
    pub(crate) post_execute: Option<RunHook>,
}

impl Hooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs before the application is assembled.
    pub fn pre_init(mut self, hook: impl Fn() + 'static) -> Self {
        self.pre_init = Some(Rc::new(hook));
        self
    }

    /// Runs after the application is assembled.
    pub fn post_init(mut self, hook: impl Fn() + 'static) -> Self {
        self.post_init = Some(Rc::new(hook));
        self
    }

    /// Runs after resolution and activation, before the command's action.
    pub fn pre_execute(
        mut self,
        hook: impl Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.pre_execute = Some(Rc::new(hook));
        self
    }

    /// Runs after the command's action returned successfully.
    pub fn post_execute(
        mut self,
        hook: impl Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.post_execute = Some(Rc::new(hook));
        self
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_init", &self.pre_init.is_some())
            .field("post_init", &self.post_init.is_some())
            .field("pre_execute", &self.pre_execute.is_some())
            .field("post_execute", &self.post_execute.is_some())
            .finish()
    }
}
