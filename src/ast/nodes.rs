//! Node types of the program tree
//!
//! The tree covers the module subset the parser accepts: imports and exports,
//! variable/function/class declarations, the common statement forms, and an
//! expression language with JSX. TypeScript annotations are erased while parsing,
//! so only type-level declarations (which emit nothing) leave a trace here.

/// A parsed module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<ModuleItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
    Import(ImportDecl),
    Export(ExportDecl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident {
    pub sym: String,
}

impl Ident {
    pub fn new(sym: impl Into<String>) -> Self {
        Ident { sym: sym.into() }
    }
}

/// A string literal. `raw` keeps the original quoting when the literal came
/// from source text; synthesized literals have no raw form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str {
    pub value: String,
    pub raw: Option<String>,
}

impl Str {
    pub fn new(value: impl Into<String>) -> Self {
        Str {
            value: value.into(),
            raw: None,
        }
    }
}

// Modules

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: Str,
    pub type_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import Local from "x"`
    Default(Ident),
    /// `import * as Local from "x"`
    Namespace(Ident),
    /// `import { imported as local } from "x"`
    Named {
        local: Ident,
        imported: Option<Ident>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    Decl(Decl),
    Default(DefaultExport),
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<Str>,
    },
    All {
        source: Str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExport {
    Fn(FnExpr),
    Class(ClassExpr),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: Ident,
    pub exported: Option<Ident>,
}

impl ExportSpecifier {
    /// The name the binding is exported under.
    pub fn exported_name(&self) -> &Ident {
        self.exported.as_ref().unwrap_or(&self.local)
    }
}

// Statements

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Decl(Decl),
    Expr(Box<Expr>),
    Return(Option<Box<Expr>>),
    If(IfStmt),
    Throw(Box<Expr>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Box<Expr>,
    pub cons: Box<Stmt>,
    pub alt: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Class(ClassDecl),
    /// `type X = ...` or `interface X {...}`; erased on output.
    TsType(Ident),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Pat,
    pub init: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub ident: Ident,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<Pat>,
    pub body: BlockStmt,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub ident: Ident,
    pub class: Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub super_class: Option<Box<Expr>>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Method {
        key: PropName,
        function: Function,
        is_static: bool,
    },
    Property {
        key: PropName,
        value: Option<Box<Expr>>,
        is_static: bool,
    },
}

// Patterns

#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    Ident(Ident),
    Array(Vec<Pat>),
    Object(Vec<ObjectPatProp>),
    Assign { left: Box<Pat>, right: Box<Expr> },
    Rest(Box<Pat>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatProp {
    KeyValue { key: PropName, value: Pat },
    Shorthand {
        ident: Ident,
        default: Option<Box<Expr>>,
    },
    Rest(Box<Pat>),
}

// Expressions

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    This,
    Ident(Ident),
    Lit(Lit),
    Array(Vec<ExprOrSpread>),
    Object(Vec<PropOrSpread>),
    Fn(FnExpr),
    Arrow(ArrowExpr),
    Class(ClassExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Unary(UnaryExpr),
    Bin(BinExpr),
    Cond(CondExpr),
    Assign(AssignExpr),
    Jsx(JsxElement),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(Str),
    /// Numeric literal, kept in its source spelling.
    Num(String),
    Bool(bool),
    Null,
    /// Template literal without substitutions, raw text between the backticks.
    Template(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOrSpread {
    pub spread: bool,
    pub expr: Box<Expr>,
}

impl ExprOrSpread {
    pub fn new(expr: Expr) -> Self {
        ExprOrSpread {
            spread: false,
            expr: Box::new(expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropOrSpread {
    Prop(Prop),
    Spread(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue { key: PropName, value: Box<Expr> },
    Shorthand(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropName {
    Ident(Ident),
    Str(Str),
    Num(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnExpr {
    pub ident: Option<Ident>,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowExpr {
    pub params: Vec<Pat>,
    pub body: ArrowBody,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(BlockStmt),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpr {
    pub ident: Option<Ident>,
    pub class: Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<ExprOrSpread>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub args: Option<Vec<ExprOrSpread>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub obj: Box<Expr>,
    pub prop: MemberProp,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Ident(Ident),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    TypeOf,
    Void,
    Await,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Await => "await",
        }
    }

    /// Word operators need a space before their operand.
    pub fn is_word(&self) -> bool {
        matches!(self, UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Await)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub arg: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    EqEqEq,
    NotEqEq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    InstanceOf,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::NullishCoalescing => "??",
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::EqEqEq => "===",
            BinaryOp::NotEqEq => "!==",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::In => "in",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    /// Binding power, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::NullishCoalescing => 4,
            BinaryOp::LogicalOr => 5,
            BinaryOp::LogicalAnd => 6,
            BinaryOp::EqEqEq | BinaryOp::NotEqEq | BinaryOp::EqEq | BinaryOp::NotEq => 10,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::InstanceOf
            | BinaryOp::In => 11,
            BinaryOp::Add | BinaryOp::Sub => 13,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub test: Box<Expr>,
    pub cons: Box<Expr>,
    pub alt: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    OrAssign,
    AndAssign,
    NullishAssign,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::OrAssign => "||=",
            AssignOp::AndAssign => "&&=",
            AssignOp::NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

// JSX

/// A JSX element. A `None` name is a fragment (`<>...</>`).
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    pub name: Option<String>,
    pub attrs: Vec<JsxAttr>,
    pub children: Vec<JsxChild>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttr {
    Named {
        name: String,
        value: Option<JsxAttrValue>,
    },
    Spread(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttrValue {
    Str(Str),
    Expr(Box<Expr>),
    Element(Box<JsxElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// Raw text between tags, whitespace untouched.
    Text(String),
    /// `{expr}`; `{}` and `{/* comment */}` carry no expression.
    Expr(Option<Box<Expr>>),
    Element(Box<JsxElement>),
}
