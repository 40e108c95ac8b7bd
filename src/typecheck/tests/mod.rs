mod basics;

use crate::diagnostic::Diagnostic;
use crate::syntax::grammar::Registry;
use crate::syntax::parser::Parser;
use crate::syntax::source::split_statements;
use crate::typecheck::{Env, TypeChecker};
use crate::types::Ty;

pub(super) fn check(source: &str) -> Result<Env<Ty>, Diagnostic> {
    let (statements, _) = split_statements(source);
    let registry = Registry::standard();
    let program = Parser::new(&registry).parse_program(&statements).unwrap();
    TypeChecker::new().check_program(&program)
}

pub(super) fn check_err(source: &str) -> Diagnostic {
    match check(source) {
        Ok(env) => panic!("expected a type error, got {:?}", env),
        Err(diag) => diag,
    }
}
