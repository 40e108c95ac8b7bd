//! Priority-tiered grammar registry.
//!
//! A statement string is matched against rule tiers from the outermost
//! construct inward: bindings, parentheses, call-like forms, comparisons,
//! additive operators, multiplicative operators, atoms. Inside a tier the
//! rules are tried in registration order. The registry is built once and
//! only read afterwards, so one instance can serve any number of parsers.

mod rules;
#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::ast::{BinOp, Node};
use crate::error::Result;

/// Rule tiers, in the order the parser consults them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Binding,
    Group,
    Call,
    Comparison,
    Additive,
    Multiplicative,
    Atom,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Binding,
        Tier::Group,
        Tier::Call,
        Tier::Comparison,
        Tier::Additive,
        Tier::Multiplicative,
        Tier::Atom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Binding => "bindings",
            Tier::Group => "parentheses",
            Tier::Call => "functions",
            Tier::Comparison => "comparisons",
            Tier::Additive => "addition/subtraction",
            Tier::Multiplicative => "multiplication/division",
            Tier::Atom => "constants/identifiers",
        }
    }
}

/// How a rule recognizes and converts its text.
#[derive(Clone, Copy)]
pub enum Form {
    /// `val <name>[: <type>] = <expr>`
    Binding,
    /// `<start><body><end>` where the bracket opened by `start` closes at the
    /// very last character and the body is at least `min_body` characters.
    Call {
        start: &'static str,
        end: &'static str,
        min_body: usize,
        build: fn(Node) -> Node,
    },
    /// `<lhs> <token> <rhs>`, split on the last top-level occurrence.
    Infix { token: &'static str, op: BinOp },
    IntLiteral,
    BoolLiteral,
    Identifier,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Binding => f.write_str("Binding"),
            Form::Call { start, end, .. } => write!(f, "Call({start:?}..{end:?})"),
            Form::Infix { token, .. } => write!(f, "Infix({token:?})"),
            Form::IntLiteral => f.write_str("IntLiteral"),
            Form::BoolLiteral => f.write_str("BoolLiteral"),
            Form::Identifier => f.write_str("Identifier"),
        }
    }
}

/// One grammar rule: the construct it produces plus how to recognize it.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub name: &'static str,
    pub form: Form,
}

impl Rule {
    pub fn new(name: &'static str, form: Form) -> Self {
        Self { name, form }
    }

    /// The operator token, for infix rules.
    pub fn token(&self) -> Option<&'static str> {
        match self.form {
            Form::Infix { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Operator tokens of one tier, grouped by length.
pub type SymbolTable = BTreeMap<usize, BTreeSet<&'static str>>;

#[derive(Clone, Debug, Default)]
pub struct Registry {
    tiers: BTreeMap<Tier, Vec<Rule>>,
    symbols: BTreeMap<Tier, SymbolTable>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule` to `tier`. Infix tokens are recorded in the tier's
    /// length table so shorter operators can yield to longer ones.
    pub fn register(&mut self, tier: Tier, rule: Rule) {
        if let Some(token) = rule.token() {
            self.symbols
                .entry(tier)
                .or_default()
                .entry(token.len())
                .or_default()
                .insert(token);
        }
        self.tiers.entry(tier).or_default().push(rule);
    }

    /// The Luka grammar.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register(Tier::Binding, Rule::new("Val", Form::Binding));
        reg.register(
            Tier::Group,
            Rule::new(
                "Paren",
                Form::Call {
                    start: "(",
                    end: ")",
                    min_body: 1,
                    build: rules::ungroup,
                },
            ),
        );
        reg.register(
            Tier::Call,
            Rule::new(
                "Print",
                Form::Call {
                    start: "print(",
                    end: ")",
                    min_body: 1,
                    build: Node::print,
                },
            ),
        );
        for (name, token, op) in [
            ("Eq", "==", BinOp::Eq),
            ("NotEq", "!=", BinOp::NotEq),
            ("Ge", ">=", BinOp::Ge),
            ("Le", "<=", BinOp::Le),
            ("Gt", ">", BinOp::Gt),
            ("Lt", "<", BinOp::Lt),
        ] {
            reg.register(Tier::Comparison, Rule::new(name, Form::Infix { token, op }));
        }
        reg.register(
            Tier::Additive,
            Rule::new(
                "Add",
                Form::Infix {
                    token: "+",
                    op: BinOp::Add,
                },
            ),
        );
        reg.register(
            Tier::Additive,
            Rule::new(
                "Sub",
                Form::Infix {
                    token: "-",
                    op: BinOp::Sub,
                },
            ),
        );
        reg.register(Tier::Atom, Rule::new("Integer", Form::IntLiteral));
        reg.register(Tier::Atom, Rule::new("Boolean", Form::BoolLiteral));
        reg.register(Tier::Atom, Rule::new("Ident", Form::Identifier));
        reg
    }

    /// Rules of one tier in registration order.
    pub fn tier(&self, tier: Tier) -> &[Rule] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every rule in match order.
    pub fn rules(&self) -> impl Iterator<Item = (Tier, &Rule)> + '_ {
        Tier::ALL
            .into_iter()
            .flat_map(move |tier| self.tier(tier).iter().map(move |rule| (tier, rule)))
    }

    pub fn symbols(&self, tier: Tier) -> Option<&SymbolTable> {
        self.symbols.get(&tier)
    }

    /// Whether a registered token of `tier` longer than `token` appears at
    /// the top level of `text`.
    pub fn longer_symbol_present(&self, tier: Tier, token: &str, text: &str) -> bool {
        let Some(table) = self.symbols(tier) else {
            return false;
        };
        table
            .range(token.len() + 1..)
            .flat_map(|(_, tokens)| tokens.iter())
            .any(|longer| !rules::top_level_matches(text, longer).is_empty())
    }

    /// Run `rule`'s validator against already-trimmed text. `Err` means the
    /// text has the rule's shape but is malformed; the parser stops there.
    pub fn matches(&self, tier: Tier, rule: &Rule, text: &str) -> Result<bool> {
        match rule.form {
            Form::Infix { token, .. } => {
                if self.longer_symbol_present(tier, token, text) {
                    return Ok(false);
                }
                Ok(rules::split_point(text, token).is_some())
            }
            _ => rules::validate(rule, text),
        }
    }

    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Human readable listing of the registered rules, one tier per line.
impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tier in Tier::ALL {
            let rules = self.tier(tier);
            if rules.is_empty() {
                continue;
            }
            let names: Vec<&str> = rules.iter().map(|r| r.name).collect();
            writeln!(f, "{}: {}", tier.name(), names.join(", "))?;
        }
        Ok(())
    }
}
