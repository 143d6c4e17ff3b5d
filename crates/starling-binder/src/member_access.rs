//! The instance-vs-class member heuristic (§4.5).
//!
//! An attribute assignment `X.attr = ...` inside a method body declares an
//! instance member of the enclosing class when `X` is the method's first
//! parameter (by position, not by the conventional name `self`/`cls`); any
//! other attribute target is an ordinary expression, not a declaration.

use starling_ast::{NodeArena, NodeIndex, SyntaxKind};
use starling_common::Atom;

/// Classification of an `Attribute` assignment target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberAccessKind {
    /// `self.attr = ...` — declares an instance member.
    Instance,
    /// `cls.attr = ...` inside a `@classmethod` (or `__new__`, or the class's
    /// own name used as the receiver) — declares a class member.
    Class,
    /// Neither; not a member declaration at all.
    None,
}

/// `first_parameter_name`: the name bound by a method's first parameter, if
/// any (used to recognize the conventional receiver regardless of its
/// spelling).
#[must_use]
pub fn first_parameter_name(ast: &NodeArena, function: NodeIndex) -> Option<Atom> {
    let data = ast.get_function(function);
    let first = data.parameters.get(0)?;
    if ast.kind_of(first) != SyntaxKind::Parameter {
        return None;
    }
    Some(ast.get_parameter(first).name.clone())
}

/// Classifies an `Attribute` node as an instance- or class-member
/// declaration (§4.5). `class_name` is the enclosing class's own name
/// (`X.y = ...` where `X` is the class itself is always a class member,
/// regardless of decorators); `receiver_name` is the name bound by the
/// method's first parameter; `is_staticmethod`/`is_classmethod` come from
/// scanning the method's decorators; `is_new` is true for a method literally
/// named `__new__`, which acts as a class method without needing the
/// decorator.
#[must_use]
pub fn classify(
    ast: &NodeArena,
    attribute: NodeIndex,
    class_name: &Atom,
    receiver_name: Option<&Atom>,
    is_staticmethod: bool,
    is_classmethod: bool,
    is_new: bool,
) -> MemberAccessKind {
    let value = ast.get_attribute(attribute).value;
    if ast.kind_of(value) != SyntaxKind::Name {
        return MemberAccessKind::None;
    }
    let name = &ast.get_name(value).id;
    if name == class_name {
        return MemberAccessKind::Class;
    }
    let Some(receiver) = receiver_name else {
        return MemberAccessKind::None;
    };
    if name != receiver {
        return MemberAccessKind::None;
    }
    if is_staticmethod {
        return MemberAccessKind::None;
    }
    if is_new || is_classmethod {
        MemberAccessKind::Class
    } else {
        MemberAccessKind::Instance
    }
}
