//! Selector parsing and matching
//!
//! Supports selector lists, the four combinators, type/universal, id,
//! class and attribute selectors, and the structural pseudo-classes.
//! Matching runs right to left against a `DomTree`.

use crate::{DomError, DomResult, DomTree, ElementData, Node, NodeData, NodeId};

/// Parsed selector list (`a, b > c`)
///
/// Pseudo-classes: `:first-child`, `:last-child`, `:only-child`,
/// `:nth-child(An+B)`, `:nth-last-child(An+B)`, `:first-of-type`,
/// `:last-of-type`, `:only-of-type`, `:nth-of-type(An+B)`,
/// `:nth-last-of-type(An+B)`, `:empty` and `:not(<compound>)`. Anything
/// else (user-action states, pseudo-elements) is an `InvalidSelector`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Sequence of simple selectors that all apply to one element (`div.a#b`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<Component>,
}

/// A simple selector
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :not(), etc.
    PseudoClass(PseudoClass),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(Nth),
    NthLastChild(Nth),
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthOfType(Nth),
    NthLastOfType(Nth),
    Empty,
    Not(CompoundSelector),
}

/// `An+B` argument of the `:nth-*` pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse `odd`, `even`, `B`, `An` or `An+B`
    pub fn parse(argument: &str) -> Option<Self> {
        let compact = argument
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "" => return None,
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some((a, b)) = compact.split_once('n') else {
            return Some(Self::new(0, compact.parse().ok()?));
        };
        let a = match a {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let b = match b {
            "" => 0,
            b if b.starts_with(['+', '-']) => b.parse().ok()?,
            _ => return None,
        };
        Some(Self::new(a, b))
    }

    /// Whether the 1-based `position` is `A*n + B` for some `n >= 0`
    pub fn matches(self, position: usize) -> bool {
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        let position = i64::try_from(position).unwrap_or(i64::MAX);
        if a == 0 {
            return position == b;
        }
        let offset = position - b;
        offset % a == 0 && offset / a >= 0
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Includes(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl SelectorList {
    /// Parse a selector string
    pub fn parse(selector: &str) -> DomResult<Self> {
        let mut parser = Parser {
            source: selector,
            rest: selector,
        };
        Ok(Self {
            selectors: parser.parse_list()?,
        })
    }

    /// Whether `node` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|selector| {
            selector
                .compounds
                .len()
                .checked_sub(1)
                .is_some_and(|last| selector.matches_at(tree, node, last))
        })
    }
}

impl ComplexSelector {
    fn matches_at(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        let Some(prev) = index.checked_sub(1) else {
            return true;
        };

        match self.combinators[prev] {
            Combinator::Descendant => tree
                .ancestors(node)
                .any(|ancestor| self.matches_at(tree, ancestor, prev)),
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| self.matches_at(tree, parent, prev)),
            Combinator::NextSibling => tree
                .previous_element_sibling(node)
                .is_some_and(|sibling| self.matches_at(tree, sibling, prev)),
            Combinator::SubsequentSibling => {
                let mut current = tree.previous_element_sibling(node);
                while let Some(sibling) = current {
                    if self.matches_at(tree, sibling, prev) {
                        return true;
                    }
                    current = tree.previous_element_sibling(sibling);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    /// Whether element `node` satisfies every component. Non-elements never match.
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.get(node).and_then(Node::as_element) else {
            return false;
        };
        self.components
            .iter()
            .all(|component| component.matches(tree, node, element))
    }
}

impl Component {
    fn matches(&self, tree: &DomTree, node: NodeId, element: &ElementData) -> bool {
        match self {
            Component::Universal => true,
            Component::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
            Component::Id(id) => element.id() == Some(id.as_str()),
            Component::Class(class) => element.has_class(class),
            Component::Attribute(attr) => attr.matches(element.get_attr(&attr.name)),
            Component::PseudoClass(pseudo) => pseudo.matches(tree, node),
        }
    }
}

impl PseudoClass {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self {
            PseudoClass::FirstChild => tree.previous_element_sibling(node).is_none(),
            PseudoClass::LastChild => tree.next_element_sibling(node).is_none(),
            PseudoClass::OnlyChild => {
                tree.previous_element_sibling(node).is_none()
                    && tree.next_element_sibling(node).is_none()
            }
            PseudoClass::NthChild(nth) => nth.matches(sibling_position(tree, node, false, false)),
            PseudoClass::NthLastChild(nth) => nth.matches(sibling_position(tree, node, true, false)),
            PseudoClass::FirstOfType => sibling_position(tree, node, false, true) == 1,
            PseudoClass::LastOfType => sibling_position(tree, node, true, true) == 1,
            PseudoClass::OnlyOfType => {
                sibling_position(tree, node, false, true) == 1
                    && sibling_position(tree, node, true, true) == 1
            }
            PseudoClass::NthOfType(nth) => nth.matches(sibling_position(tree, node, false, true)),
            PseudoClass::NthLastOfType(nth) => nth.matches(sibling_position(tree, node, true, true)),
            PseudoClass::Empty => tree.children(node).all(|(_, child)| match &child.data {
                NodeData::Element(_) => false,
                NodeData::Text(text) => text.is_empty(),
                NodeData::Comment(_) | NodeData::Document => true,
            }),
            PseudoClass::Not(inner) => !inner.matches(tree, node),
        }
    }
}

/// 1-based position of `node` among its element siblings, counted from the
/// end when `from_end` is set and among same-tag siblings when `of_type` is
fn sibling_position(tree: &DomTree, node: NodeId, from_end: bool, of_type: bool) -> usize {
    let tag_of = |id| tree.get(id).and_then(Node::as_element).map(|e| e.tag_name.as_str());
    let step = |id| {
        if from_end {
            tree.next_element_sibling(id)
        } else {
            tree.previous_element_sibling(id)
        }
    };

    let tag = tag_of(node);
    let mut position = 1;
    let mut current = step(node);
    while let Some(sibling) = current {
        if !of_type || tag_of(sibling) == tag {
            position += 1;
        }
        current = step(sibling);
    }
    position
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (Some(matcher), Some(value)) = (&self.matcher, value) else {
            // [attr] - just check existence
            return self.matcher.is_none() && value.is_some();
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Includes(expected) => {
                !expected.is_empty() && value.split_whitespace().any(|w| w == fold(expected))
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{expected}-"))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && value.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && value.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && value.contains(&fold(expected))
            }
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Returns whether any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let trimmed = self.rest.trim_start();
        let skipped = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        skipped
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::invalid_selector(self.source, reason)
    }

    fn unexpected(&self) -> DomError {
        match self.peek() {
            Some(c) => self.error(format!("unexpected '{c}'")),
            None => self.error("unexpected end of selector"),
        }
    }

    fn parse_list(&mut self) -> DomResult<Vec<ComplexSelector>> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(selectors),
                Some(',') => {
                    self.bump();
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn parse_complex(&mut self) -> DomResult<ComplexSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> DomResult<CompoundSelector> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                components.push(Component::Universal);
            }
            Some(c) if is_ident_start(c) || c == '\\' => {
                components.push(Component::Type(self.parse_ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            let component = match self.peek() {
                Some('#') => {
                    self.bump();
                    Component::Id(self.parse_ident()?)
                }
                Some('.') => {
                    self.bump();
                    Component::Class(self.parse_ident()?)
                }
                Some('[') => {
                    self.bump();
                    Component::Attribute(self.parse_attribute()?)
                }
                Some(':') => {
                    self.bump();
                    Component::PseudoClass(self.parse_pseudo_class()?)
                }
                _ => break,
            };
            components.push(component);
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> DomResult<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                }
            } else if is_name_char(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if ident.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected identifier, found '{c}'")),
                None => self.error("expected identifier"),
            });
        }
        let unsigned = ident.strip_prefix('-').unwrap_or(&ident);
        if unsigned.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(format!("identifier '{ident}' starts with a digit")));
        }
        Ok(ident)
    }

    fn parse_string(&mut self, quote: char) -> DomResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_attribute(&mut self) -> DomResult<AttributeSelector> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.bump() {
            Some(']') => {
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => '=',
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if !self.eat('=') {
                    return Err(self.error(format!("expected '=' after '{c}'")));
                }
                c
            }
            Some(c) => return Err(self.error(format!("unexpected '{c}' in attribute selector"))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(quote)?
            }
            Some(_) => self.parse_ident()?,
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_whitespace();
        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.bump();
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }
        if !self.eat(']') {
            return Err(match self.peek() {
                Some(_) => self.unexpected(),
                None => self.error("unterminated attribute selector"),
            });
        }

        let matcher = match operator {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Includes(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn parse_pseudo_class(&mut self) -> DomResult<PseudoClass> {
        if self.peek() == Some(':') {
            return Err(self.error("pseudo-elements are not supported"));
        }
        let name = self.parse_ident()?.to_ascii_lowercase();
        match name.as_str() {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "first-of-type" => Ok(PseudoClass::FirstOfType),
            "last-of-type" => Ok(PseudoClass::LastOfType),
            "only-of-type" => Ok(PseudoClass::OnlyOfType),
            "nth-child" => Ok(PseudoClass::NthChild(self.parse_nth_argument(&name)?)),
            "nth-last-child" => Ok(PseudoClass::NthLastChild(self.parse_nth_argument(&name)?)),
            "nth-of-type" => Ok(PseudoClass::NthOfType(self.parse_nth_argument(&name)?)),
            "nth-last-of-type" => Ok(PseudoClass::NthLastOfType(self.parse_nth_argument(&name)?)),
            "empty" => Ok(PseudoClass::Empty),
            "not" => {
                if !self.eat('(') {
                    return Err(self.error("expected '(' after ':not'"));
                }
                self.skip_whitespace();
                let inner = self.parse_compound()?;
                self.skip_whitespace();
                if !self.eat(')') {
                    return Err(self.error("expected ')' to close ':not('"));
                }
                Ok(PseudoClass::Not(inner))
            }
            other => Err(self.error(format!("unsupported pseudo-class ':{other}'"))),
        }
    }

    fn parse_nth_argument(&mut self, name: &str) -> DomResult<Nth> {
        if !self.eat('(') {
            return Err(self.error(format!("expected '(' after ':{name}'")));
        }
        let rest = self.rest;
        let Some(end) = rest.find(')') else {
            return Err(self.error(format!("expected ')' to close ':{name}('")));
        };
        let argument = &rest[..end];
        let Some(nth) = Nth::parse(argument) else {
            return Err(self.error(format!("invalid ':{name}' argument '{}'", argument.trim())));
        };
        self.rest = &rest[end + 1..];
        Ok(nth)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
