//! Dispatcher: turns raw command text into a handler invocation.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Span};
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditLogger, AuditOutcome};
use crate::entity::{EntityDirectory, InvokerId, Player, Uid};
use crate::error::{CommandError, InputErrorKind};
use crate::feedback::{keys, FeedbackSink};
use crate::permission::PermissionPolicy;

use super::metadata::ExecutionMode;
use super::registry::CommandRegistry;
use super::target::{RememberedTargets, TargetChange, TargetDirective, TargetResolver};
use super::traits::CommandHandler;
use super::types::CommandContext;

/// Terminal state of one invocation.
#[derive(Debug)]
pub enum InvocationOutcome {
    /// `target` with no uid cleared the remembered target.
    TargetCleared,
    /// The remembered target was set; nothing was dispatched.
    TargetSet { uid: Uid, online: bool },
    /// The handler ran inline, or was handed to a concurrent task.
    Executed { label: String, mode: ExecutionMode },
    /// The invocation was aborted. Feedback (if any) has been sent.
    Rejected(CommandError),
}

impl From<TargetChange> for InvocationOutcome {
    fn from(change: TargetChange) -> Self {
        match change {
            TargetChange::Cleared => Self::TargetCleared,
            TargetChange::Set { uid, online } => Self::TargetSet { uid, online },
        }
    }
}

/// What the audit trail needs to know about an invocation in flight.
#[derive(Default)]
struct Attempt {
    label: Option<String>,
    target: Option<Uid>,
}

/// Dispatches raw command text on behalf of invokers.
///
/// `invoke` takes `&self` and may be called from any number of sessions at
/// once; all shared state is internally synchronized.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    directory: Arc<dyn EntityDirectory>,
    policy: Arc<dyn PermissionPolicy>,
    feedback: Arc<dyn FeedbackSink>,
    remembered: RememberedTargets,
    audit: Option<Arc<AuditLogger>>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        directory: Arc<dyn EntityDirectory>,
        policy: Arc<dyn PermissionPolicy>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            registry,
            directory,
            policy,
            feedback,
            remembered: RememberedTargets::new(),
            audit: None,
        }
    }

    /// Record every invocation to an audit log.
    pub fn with_audit(mut self, logger: Arc<AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// The uid currently remembered for `invoker`.
    pub fn remembered_target(&self, invoker: &InvokerId) -> Option<Uid> {
        self.remembered.get(invoker)
    }

    /// Drop the remembered target of `invoker`, e.g. when its session ends.
    pub fn forget_target(&self, invoker: &InvokerId) -> Option<Uid> {
        self.remembered.forget(invoker)
    }

    /// Parse and run one line of command input.
    ///
    /// `invoker` is `None` for the console. `target` is the caller's default
    /// target; an inline `@uid` argument overrides it.
    pub fn invoke(
        &self,
        invoker: Option<&Arc<Player>>,
        target: Option<Arc<Player>>,
        raw: &str,
    ) -> InvocationOutcome {
        let invocation_id = Uuid::new_v4();
        let invoker_id = InvokerId::of(invoker.map(Arc::as_ref));
        let span = info_span!("invoke", invocation = %invocation_id, invoker = %invoker_id);
        let _guard = span.enter();

        let mut attempt = Attempt::default();
        let dispatched =
            self.dispatch(invocation_id, invoker, &invoker_id, target, raw, &mut attempt);
        let outcome = match dispatched {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report(invoker, &err);
                InvocationOutcome::Rejected(err)
            }
        };

        self.record(invocation_id, &invoker_id, attempt, &outcome);
        outcome
    }

    fn dispatch(
        &self,
        invocation_id: Uuid,
        invoker: Option<&Arc<Player>>,
        invoker_id: &InvokerId,
        supplied: Option<Arc<Player>>,
        raw: &str,
        attempt: &mut Attempt,
    ) -> Result<InvocationOutcome, CommandError> {
        let mut tokens = raw
            .trim()
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let label = tokens
            .next()
            .ok_or_else(|| CommandError::input(InputErrorKind::NotSpecified))?;
        let mut args: Vec<String> = tokens.collect();
        attempt.label = Some(label.clone());

        let resolver = TargetResolver::new(self.directory.as_ref(), &self.remembered);

        if let Some(directive) = TargetDirective::parse(&label, &args) {
            let change = resolver.apply(invoker_id, &directive)?;
            if let TargetChange::Set { uid, .. } = change {
                attempt.target = Some(uid);
            }
            self.confirm(invoker, change);
            return Ok(change.into());
        }

        let entry = self.registry.lookup_entry(&label).ok_or_else(|| {
            CommandError::input(InputErrorKind::UnknownCommand {
                label: label.clone(),
            })
        })?;

        let target = resolver.resolve(invoker, invoker_id, supplied, &mut args)?;
        attempt.target = target.as_ref().map(|t| t.uid());

        let meta = &entry.metadata;
        let allowed = self.policy.check_permission(
            invoker.map(Arc::as_ref),
            target.as_deref(),
            &meta.permission,
            meta.permission_targeted,
        );
        if !allowed {
            return Err(CommandError::PermissionDenied {
                node: meta.permission.clone(),
            });
        }

        meta.target_requirement.check(target.as_deref())?;

        info!(
            command = %label,
            target = ?attempt.target,
            mode = ?meta.execution,
            "Dispatching command"
        );

        let ctx = CommandContext::new(
            invocation_id,
            label.clone(),
            invoker.cloned(),
            target,
            Arc::clone(&self.feedback),
        );
        execute(Arc::clone(&entry.handler), meta.execution, ctx, args);

        Ok(InvocationOutcome::Executed {
            label,
            mode: meta.execution,
        })
    }

    fn confirm(&self, invoker: Option<&Arc<Player>>, change: TargetChange) {
        let recipient = invoker.map(Arc::as_ref);
        match change {
            TargetChange::Cleared => self.feedback.send(recipient, keys::CLEAR_TARGET, &[]),
            TargetChange::Set { uid, online } => {
                let args = [uid.to_string()];
                self.feedback.send(recipient, keys::SET_TARGET, &args);
                let status = if online {
                    keys::SET_TARGET_ONLINE
                } else {
                    keys::SET_TARGET_OFFLINE
                };
                self.feedback.send(recipient, status, &args);
            }
        }
    }

    fn report(&self, invoker: Option<&Arc<Player>>, err: &CommandError) {
        match err.feedback_key() {
            Some(key) => {
                debug!(error = %err, "Invocation rejected");
                self.feedback
                    .send(invoker.map(Arc::as_ref), key, &err.feedback_args());
            }
            // The policy already told the invoker whatever it wanted to.
            None => debug!(error = %err, "Invocation denied"),
        }
    }

    fn record(
        &self,
        invocation_id: Uuid,
        invoker_id: &InvokerId,
        attempt: Attempt,
        outcome: &InvocationOutcome,
    ) {
        let (Some(logger), Some(label)) = (&self.audit, attempt.label) else {
            return;
        };

        let outcome = match outcome {
            InvocationOutcome::TargetCleared => AuditOutcome::TargetCleared,
            InvocationOutcome::TargetSet { uid, .. } => AuditOutcome::TargetSet { uid: *uid },
            InvocationOutcome::Executed { mode, .. } => AuditOutcome::Executed { mode: *mode },
            InvocationOutcome::Rejected(CommandError::PermissionDenied { node }) => {
                AuditOutcome::Denied { node: node.clone() }
            }
            InvocationOutcome::Rejected(err) => AuditOutcome::Rejected {
                reason: err.to_string(),
            },
        };

        let entry = AuditEntry::new(
            Utc::now().to_rfc3339(),
            invocation_id,
            invoker_id.to_string(),
            label,
            attempt.target,
            outcome,
        );
        if let Err(e) = logger.log(&entry) {
            error!(error = %e, "Failed to write audit log entry");
        }
    }
}

/// Run a handler according to its execution mode.
///
/// Concurrent handlers go to tokio's blocking pool when a runtime is
/// current, otherwise to a fresh thread. Either way a panic stays inside
/// the task.
fn execute(
    handler: Arc<dyn CommandHandler>,
    mode: ExecutionMode,
    ctx: CommandContext,
    args: Vec<String>,
) {
    match mode {
        ExecutionMode::Inline => run_handler(handler.as_ref(), &ctx, args),
        ExecutionMode::Concurrent => {
            let thread_name = format!("command-{}", ctx.label);
            let span = Span::current();
            let task = move || span.in_scope(|| run_handler(handler.as_ref(), &ctx, args));

            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    // Detached: nobody awaits the result.
                    drop(runtime.spawn_blocking(task));
                }
                Err(_) => {
                    if let Err(e) = thread::Builder::new().name(thread_name).spawn(task) {
                        error!(error = %e, "Failed to spawn command thread");
                    }
                }
            }
        }
    }
}

fn run_handler(handler: &dyn CommandHandler, ctx: &CommandContext, args: Vec<String>) {
    match handler.execute(ctx, args) {
        Ok(()) => debug!(command = %ctx.label, "Command completed"),
        Err(e) => warn!(command = %ctx.label, error = %e, "Command handler failed"),
    }
}
