//! Applies a parsed document to a state store.
//!
//! Statements are applied in document order while the enclosing scopes
//! are open, with one exception: transitions *without* a label are
//! queued as structural events and flushed when their enclosing block
//! closes. A labeled transition is therefore stored before an earlier
//! bare one from the same block. The flush runs while the block's scope
//! is still active, so bare transitions inside composite blocks qualify
//! against the correct scope.

use machina_core::{CoreError, StateDb, StoreEvent};

use crate::{
    ast::Statement,
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
};

pub(crate) fn apply_document(
    statements: &[Spanned<Statement>],
    db: &mut StateDb,
) -> Result<(), Diagnostic> {
    let mut queued = Vec::new();
    for statement in statements {
        apply_statement(statement, db, &mut queued)?;
    }
    flush(queued, db)
}

fn apply_statement(
    statement: &Spanned<Statement>,
    db: &mut StateDb,
    queued: &mut Vec<(StoreEvent, Span)>,
) -> Result<(), Diagnostic> {
    let span = statement.span();
    match statement.inner() {
        Statement::Description { name, text } => db
            .add_state(name, Some(text.as_str()))
            .map_err(|err| core_diagnostic(err, span)),

        Statement::Transition {
            from,
            to,
            label: Some(label),
        } => {
            db.add_state(from, None)
                .map_err(|err| core_diagnostic(err, span))?;
            db.add_state(to, None)
                .map_err(|err| core_diagnostic(err, span))?;
            db.add_transition(from, to, Some(label.as_str()))
                .map_err(|err| core_diagnostic(err, span))
        }

        Statement::Transition {
            from,
            to,
            label: None,
        } => {
            queued.push((
                StoreEvent::AddState {
                    name: from.clone(),
                    description: None,
                },
                span,
            ));
            queued.push((
                StoreEvent::AddState {
                    name: to.clone(),
                    description: None,
                },
                span,
            ));
            queued.push((
                StoreEvent::AddTransition {
                    from: from.clone(),
                    to: to.clone(),
                    description: None,
                },
                span,
            ));
            Ok(())
        }

        Statement::Block { name, body } => {
            // Register the composite itself before opening its scope, so
            // its id is `Name` and not `Name/Name`.
            db.add_state(name, None)
                .map_err(|err| core_diagnostic(err, span))?;
            db.push_scope(name)
                .map_err(|err| core_diagnostic(err, span))?;

            let mut inner = Vec::new();
            for inner_statement in body {
                apply_statement(inner_statement, db, &mut inner)?;
            }
            // Flush before the pop: queued bare transitions belong to this
            // block's scope.
            flush(inner, db)?;

            db.pop_scope().map_err(|err| core_diagnostic(err, span))
        }
    }
}

fn flush(queued: Vec<(StoreEvent, Span)>, db: &mut StateDb) -> Result<(), Diagnostic> {
    for (event, span) in queued {
        db.apply(event).map_err(|err| core_diagnostic(err, span))?;
    }
    Ok(())
}

fn core_diagnostic(err: CoreError, span: Span) -> Diagnostic {
    match err {
        CoreError::InvalidName { .. } => Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E200)
            .with_label(span, "declared here")
            .with_help("state names must not contain `/`"),
        CoreError::UnbalancedScope => Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E102)
            .with_label(span, "scope closed here"),
    }
}
