//! Integration-style tests driving the full parse pipeline.

use crate::{ErrorCode, parse};

const SIMPLE: &str = "stateDiagram

  Idle --> Configuring
  Configuring --> Idle : EvConfig
  ";

const WITH_DESCRIPTION: &str = "stateDiagram

  A: This is state a
  B: This is state b

  A --> B
  ";

const COMPOSITE: &str = "stateDiagram

    S1 --> Composite1: outer transition

    state Composite1 {
      S1 --> S2 : inner transition
    }
    ";

#[test]
fn parses_a_simple_state_diagram() {
    let db = parse(SIMPLE).unwrap();

    let states = db.states();
    assert_eq!(states["Idle"].name, "Idle");
    assert_eq!(states["Configuring"].name, "Configuring");

    // Labeled transitions are applied at their declaration point; bare
    // ones are flushed at the end of their block, so the second document
    // line is stored first.
    let transitions = db.transitions();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0].from, "Configuring");
    assert_eq!(transitions[0].to, "Idle");
    assert_eq!(transitions[0].description, "EvConfig");
    assert_eq!(transitions[1].from, "Idle");
    assert_eq!(transitions[1].to, "Configuring");
    assert_eq!(transitions[1].description, "");
}

#[test]
fn extracts_state_descriptions() {
    let db = parse(WITH_DESCRIPTION).unwrap();

    let states = db.states();
    assert_eq!(states["A"].description, "This is state a");
    assert_eq!(states["B"].description, "This is state b");

    // The later bare transition must not clobber the descriptions.
    assert_eq!(db.transitions().len(), 1);
    assert_eq!(db.transitions()[0].from, "A");
    assert_eq!(db.transitions()[0].to, "B");
}

#[test]
fn handles_a_composite_state() {
    let db = parse(COMPOSITE).unwrap();

    let states = db.states();
    assert_eq!(states["Composite1"].name, "Composite1");
    assert_eq!(states["Composite1/S1"].name, "S1");
    assert_eq!(states["Composite1/S2"].name, "S2");

    let transitions = db.transitions();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0].from, "S1");
    assert_eq!(transitions[0].to, "Composite1");
    assert_eq!(transitions[0].description, "outer transition");
    assert_eq!(transitions[1].from, "Composite1/S1");
    assert_eq!(transitions[1].to, "Composite1/S2");
    assert_eq!(transitions[1].description, "inner transition");
}

#[test]
fn same_local_name_in_different_scopes_yields_distinct_ids() {
    let db = parse(COMPOSITE).unwrap();
    // `S1` appears both at top level (as a transition endpoint) and inside
    // the composite block.
    assert!(db.states().contains_key("S1"));
    assert!(db.states().contains_key("Composite1/S1"));
}

#[test]
fn bare_transition_inside_a_block_resolves_to_the_block_scope() {
    let source = "stateDiagram

    state C {
      X --> Y
    }
    ";
    let db = parse(source).unwrap();

    assert_eq!(db.transitions().len(), 1);
    assert_eq!(db.transitions()[0].from, "C/X");
    assert_eq!(db.transitions()[0].to, "C/Y");
}

#[test]
fn nested_blocks_qualify_two_levels_deep() {
    let source = "stateDiagram

    state Outer {
      state Inner {
        A --> B : deep
      }
    }
    ";
    let db = parse(source).unwrap();

    assert!(db.states().contains_key("Outer"));
    assert!(db.states().contains_key("Outer/Inner"));
    assert!(db.states().contains_key("Outer/Inner/A"));
    assert_eq!(db.transitions()[0].from, "Outer/Inner/A");
    assert_eq!(db.transitions()[0].to, "Outer/Inner/B");
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "stateDiagram

    %% a comment line
    Idle --> Busy : go
    %% another one
    ";
    let db = parse(source).unwrap();
    assert_eq!(db.transitions().len(), 1);
    assert_eq!(db.transitions()[0].description, "go");
}

#[test]
fn missing_header_is_an_incomplete_input_error() {
    let err = parse("Idle --> Busy\n").unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
}

#[test]
fn unmatched_close_brace_is_rejected() {
    let err = parse("stateDiagram\n}\n").unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
}

#[test]
fn unclosed_block_is_rejected() {
    let source = "stateDiagram

    state C {
      X --> Y
    ";
    let err = parse(source).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
}

#[test]
fn malformed_statement_is_an_unexpected_token_error() {
    let source = "stateDiagram

    state Lonely
    ";
    let err = parse(source).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}

#[test]
fn delimiter_in_a_name_is_rejected_with_a_span() {
    let source = "stateDiagram

    Bad/Name --> B : oops
    ";
    let err = parse(source).unwrap_err();
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E200));
    assert!(!diagnostic.labels().is_empty());
    // The label points at the offending statement.
    let span = diagnostic.labels()[0].span();
    assert_eq!(
        source[span.start()..span.end()].trim_end(),
        "Bad/Name --> B : oops"
    );
}
