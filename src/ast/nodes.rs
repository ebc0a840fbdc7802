//! AST node definitions.
//!
//! Declarators are stored the way the source wraps them: the innermost node
//! of every chain is a [`VarDeclarator`], and pointer/array/function layers
//! wrap outward in declarator syntax order. Top-level annotations (an
//! assembler name and trailing attributes) always live on the innermost
//! variable declarator, no matter how many layers enclose it; see
//! [`Declarator::annotate`].

use thin_vec::ThinVec;

use crate::ast::{Ident, NodeInfo, Symbol};
use crate::diagnostic::ParseError;
use crate::position::{HasPos, Pos};
use crate::token::{FloatSuffix, IntSuffix};

/// A GNU `__attribute__` item: a name with optional expression arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub args: ThinVec<Expr>,
    pub info: NodeInfo,
}

// === Top level ===

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub decls: Vec<ExternalDecl>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExternalDecl {
    FunctionDef(Box<FunctionDef>),
    Declaration(Declaration),
    Asm(AsmStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub specifiers: ThinVec<DeclSpecifier>,
    pub declarator: Declarator,
    /// K&R parameter declarations between the declarator and the body;
    /// empty for prototype definitions.
    pub kr_declarations: Vec<Declaration>,
    pub body: CompoundStmt,
    pub info: NodeInfo,
}

// === Declarations ===

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub specifiers: ThinVec<DeclSpecifier>,
    pub declarators: ThinVec<InitDeclarator>,
    pub info: NodeInfo,
}

/// One comma-separated slot of a declaration. Struct members may carry a
/// bit-field width instead of (or besides) a declarator; an unnamed
/// bit-field has neither name nor declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct InitDeclarator {
    pub declarator: Option<Declarator>,
    pub initializer: Option<Initializer>,
    pub bit_width: Option<Expr>,
}

/// One entry of a declaration-specifier list, in source order.
///
/// An `__attribute__` in specifier position rides along as
/// [`TypeQualifier::Attribute`]. Note that gcc's attribute-syntax rules make
/// an attribute directly following a struct/union/enum specifier in the same
/// list a dubious placement; the parser accepts it and preserves the order,
/// leaving the judgment to later passes.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclSpecifier {
    Storage(StorageClass, NodeInfo),
    Qualifier(TypeQualifier),
    Type(TypeSpecifier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
    /// GNU `__thread` / C11 `_Thread_local`.
    Thread,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeQualifier {
    Const(NodeInfo),
    Volatile(NodeInfo),
    Restrict(NodeInfo),
    Inline(NodeInfo),
    Attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpecifier {
    Void(NodeInfo),
    Char(NodeInfo),
    Short(NodeInfo),
    Int(NodeInfo),
    Long(NodeInfo),
    Float(NodeInfo),
    Double(NodeInfo),
    Signed(NodeInfo),
    Unsigned(NodeInfo),
    Bool(NodeInfo),
    Complex(NodeInfo),
    Record(RecordSpecifier),
    Enum(EnumSpecifier),
    TypedefName(Ident),
    TypeofExpr(Box<Expr>, NodeInfo),
    TypeofType(Box<TypeName>, NodeInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Union,
}

/// Struct or union specifier. `members: None` is a forward reference
/// (`struct S`), `Some(vec![])` an explicitly empty body (`struct S {}`).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSpecifier {
    pub kind: RecordKind,
    pub tag: Option<Ident>,
    pub members: Option<Vec<Declaration>>,
    pub attributes: ThinVec<Attribute>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpecifier {
    pub tag: Option<Ident>,
    pub enumerators: Option<Vec<Enumerator>>,
    pub attributes: ThinVec<Attribute>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: Ident,
    pub value: Option<Expr>,
}

// === Declarators ===

#[derive(Debug, Clone, PartialEq)]
pub enum Declarator {
    Var(VarDeclarator),
    Pointer(PointerDeclarator),
    Array(ArrayDeclarator),
    Function(FunctionDeclarator),
}

/// The innermost node of every declarator chain. `name: None` makes the
/// chain abstract (type names, unnamed parameters, unnamed bit-fields).
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Option<Ident>,
    pub asm_name: Option<AsmName>,
    pub attributes: ThinVec<Attribute>,
    pub info: NodeInfo,
}

/// `asm("symbol")` attached to a declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct AsmName {
    pub name: Symbol,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerDeclarator {
    pub qualifiers: ThinVec<TypeQualifier>,
    pub inner: Box<Declarator>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDeclarator {
    pub inner: Box<Declarator>,
    pub qualifiers: ThinVec<TypeQualifier>,
    pub size: Option<Box<Expr>>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclarator {
    pub inner: Box<Declarator>,
    pub params: ParamList,
    pub attributes: ThinVec<Attribute>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamList {
    /// Old-style `f(a, b)` identifier list; empty for `f()`.
    Identifiers(Vec<Ident>),
    /// Prototype parameters, with the trailing-`...` flag.
    Prototype { params: Vec<ParamDecl>, variadic: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub specifiers: ThinVec<DeclSpecifier>,
    pub declarator: Option<Box<Declarator>>,
    pub info: NodeInfo,
}

/// A type name as used in casts, `sizeof`, `typeof`, compound literals.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub specifiers: ThinVec<DeclSpecifier>,
    pub declarator: Option<Box<Declarator>>,
    pub info: NodeInfo,
}

impl Declarator {
    /// The declared identifier, found on the innermost variable declarator.
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Declarator::Var(var) => var.name.as_ref(),
            Declarator::Pointer(ptr) => ptr.inner.name(),
            Declarator::Array(arr) => arr.inner.name(),
            Declarator::Function(fun) => fun.inner.name(),
        }
    }

    /// The innermost variable declarator of the chain, which carries the
    /// name, the assembler name, and the trailing attributes.
    pub fn innermost_var(&self) -> &VarDeclarator {
        match self {
            Declarator::Var(var) => var,
            Declarator::Pointer(ptr) => ptr.inner.innermost_var(),
            Declarator::Array(arr) => arr.inner.innermost_var(),
            Declarator::Function(fun) => fun.inner.innermost_var(),
        }
    }

    /// Whether the chain contains a function layer, i.e. the declarator
    /// could head a function definition.
    pub fn is_function(&self) -> bool {
        match self {
            Declarator::Var(_) => false,
            Declarator::Pointer(ptr) => ptr.inner.is_function(),
            Declarator::Array(arr) => arr.inner.is_function(),
            Declarator::Function(_) => true,
        }
    }

    /// The parameter list of the outermost function layer, if any.
    pub fn param_list(&self) -> Option<&ParamList> {
        match self {
            Declarator::Var(_) => None,
            Declarator::Pointer(ptr) => ptr.inner.param_list(),
            Declarator::Array(arr) => arr.inner.param_list(),
            Declarator::Function(fun) => Some(&fun.params),
        }
    }

    /// Attach a top-level assembler name and trailing attributes.
    ///
    /// Both annotations qualify the identifier being declared, not the
    /// outermost wrapper, so the chain is descended and rebuilt with the
    /// annotations on the innermost variable declarator. Attaching an
    /// assembler name to a declarator that already has one is an error;
    /// attaching nothing is the identity.
    pub fn annotate(
        self,
        asm_name: Option<AsmName>,
        attributes: ThinVec<Attribute>,
    ) -> Result<Declarator, ParseError> {
        if asm_name.is_none() && attributes.is_empty() {
            return Ok(self);
        }
        match self {
            Declarator::Var(mut var) => {
                if let Some(new_name) = asm_name {
                    if var.asm_name.is_some() {
                        let name = var
                            .name
                            .as_ref()
                            .map(|ident| ident.name.to_string())
                            .unwrap_or_else(|| "<anonymous>".to_string());
                        return Err(ParseError::AsmNameConflict {
                            name,
                            pos: new_name.info.pos,
                        });
                    }
                    var.asm_name = Some(new_name);
                }
                var.attributes.extend(attributes);
                Ok(Declarator::Var(var))
            }
            Declarator::Pointer(ptr) => {
                let PointerDeclarator {
                    qualifiers,
                    inner,
                    info,
                } = ptr;
                Ok(Declarator::Pointer(PointerDeclarator {
                    qualifiers,
                    inner: Box::new(inner.annotate(asm_name, attributes)?),
                    info,
                }))
            }
            Declarator::Array(arr) => {
                let ArrayDeclarator {
                    inner,
                    qualifiers,
                    size,
                    info,
                } = arr;
                Ok(Declarator::Array(ArrayDeclarator {
                    inner: Box::new(inner.annotate(asm_name, attributes)?),
                    qualifiers,
                    size,
                    info,
                }))
            }
            Declarator::Function(fun) => {
                let FunctionDeclarator {
                    inner,
                    params,
                    attributes: fn_attrs,
                    info,
                } = fun;
                Ok(Declarator::Function(FunctionDeclarator {
                    inner: Box::new(inner.annotate(asm_name, attributes)?),
                    params,
                    attributes: fn_attrs,
                    info,
                }))
            }
        }
    }
}

impl Declaration {
    /// Whether the specifier list contains the `typedef` storage class.
    pub fn is_typedef(&self) -> bool {
        self.specifiers.iter().any(|spec| {
            matches!(spec, DeclSpecifier::Storage(StorageClass::Typedef, _))
        })
    }
}

// === Statements ===

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Labeled {
        label: Ident,
        attributes: ThinVec<Attribute>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    Case {
        expr: Box<Expr>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    /// GNU `case lo ... hi:`.
    CaseRange {
        lo: Box<Expr>,
        hi: Box<Expr>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    Default {
        body: Box<Stmt>,
        info: NodeInfo,
    },
    Compound(CompoundStmt),
    /// Expression statement; `expr: None` is the empty statement `;`.
    Expr {
        expr: Option<Box<Expr>>,
        info: NodeInfo,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        info: NodeInfo,
    },
    Switch {
        cond: Box<Expr>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    While {
        cond: Box<Expr>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Box<Expr>,
        info: NodeInfo,
    },
    For {
        init: ForInit,
        cond: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
        body: Box<Stmt>,
        info: NodeInfo,
    },
    Goto {
        label: Ident,
        info: NodeInfo,
    },
    /// GNU computed goto `goto *expr;`.
    GotoExpr {
        target: Box<Expr>,
        info: NodeInfo,
    },
    Continue {
        info: NodeInfo,
    },
    Break {
        info: NodeInfo,
    },
    Return {
        expr: Option<Box<Expr>>,
        info: NodeInfo,
    },
    Asm(AsmStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Empty,
    Expr(Box<Expr>),
    Decl(Box<Declaration>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    /// GNU `__label__ a, b;` declarations at the head of the block.
    pub local_labels: Vec<Ident>,
    pub items: Vec<BlockItem>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Declaration(Declaration),
    Statement(Stmt),
    /// GNU nested function definition.
    NestedFunction(Box<FunctionDef>),
}

// === Inline assembly ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmQualifier {
    Volatile,
    Inline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsmStmt {
    pub qualifier: Option<AsmQualifier>,
    pub template: Symbol,
    pub outputs: Vec<AsmOperand>,
    pub inputs: Vec<AsmOperand>,
    pub clobbers: Vec<Symbol>,
    pub info: NodeInfo,
}

/// `[name] "constraint" (expr)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsmOperand {
    pub symbolic_name: Option<Ident>,
    pub constraint: Symbol,
    pub expr: Expr,
}

// === Expressions ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    AddressOf,
    Deref,
    Plus,
    Minus,
    BitNot,
    LogicNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    BitAnd,
    BitXor,
    BitOr,
    LogicAnd,
    LogicOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    MulAssign,
    DivAssign,
    ModAssign,
    AddAssign,
    SubAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOp {
    Dot,
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(u64, IntSuffix),
    Float(Symbol, FloatSuffix),
    Char(u32),
    String(Symbol),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `a, b, c` flattened left to right.
    Comma(Vec<Expr>, NodeInfo),
    Assign(AssignOp, Box<Expr>, Box<Expr>, NodeInfo),
    /// `c ? t : e`; `t` is `None` for the GNU elision `c ?: e`.
    Conditional(Box<Expr>, Option<Box<Expr>>, Box<Expr>, NodeInfo),
    Binary(BinaryOp, Box<Expr>, Box<Expr>, NodeInfo),
    Cast(Box<TypeName>, Box<Expr>, NodeInfo),
    Unary(UnaryOp, Box<Expr>, NodeInfo),
    SizeofExpr(Box<Expr>, NodeInfo),
    SizeofType(Box<TypeName>, NodeInfo),
    AlignofExpr(Box<Expr>, NodeInfo),
    AlignofType(Box<TypeName>, NodeInfo),
    Index(Box<Expr>, Box<Expr>, NodeInfo),
    Call(Box<Expr>, Vec<Expr>, NodeInfo),
    Member(Box<Expr>, MemberOp, Ident, NodeInfo),
    CompoundLiteral(Box<TypeName>, InitList, NodeInfo),
    /// GNU statement expression `({ ... })`.
    StmtExpr(CompoundStmt, NodeInfo),
    /// GNU `&&label`.
    LabelAddr(Ident, NodeInfo),
    Real(Box<Expr>, NodeInfo),
    Imag(Box<Expr>, NodeInfo),
    Ident(Ident),
    Constant(Constant, NodeInfo),
    VaArg(Box<Expr>, Box<TypeName>, NodeInfo),
    Offsetof(Box<TypeName>, Vec<Designator>, NodeInfo),
    TypesCompatible(Box<TypeName>, Box<TypeName>, NodeInfo),
}

// === Initializers ===

#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    Expr(Box<Expr>),
    List(InitList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitList {
    pub items: Vec<InitItem>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitItem {
    pub designators: Vec<Designator>,
    pub init: Initializer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Designator {
    Index(Expr, NodeInfo),
    Member(Ident),
    /// GNU `[lo ... hi]`.
    Range(Expr, Expr, NodeInfo),
}

// === Position plumbing ===

impl Expr {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Expr::Comma(_, info)
            | Expr::Assign(_, _, _, info)
            | Expr::Conditional(_, _, _, info)
            | Expr::Binary(_, _, _, info)
            | Expr::Cast(_, _, info)
            | Expr::Unary(_, _, info)
            | Expr::SizeofExpr(_, info)
            | Expr::SizeofType(_, info)
            | Expr::AlignofExpr(_, info)
            | Expr::AlignofType(_, info)
            | Expr::Index(_, _, info)
            | Expr::Call(_, _, info)
            | Expr::Member(_, _, _, info)
            | Expr::CompoundLiteral(_, _, info)
            | Expr::StmtExpr(_, info)
            | Expr::LabelAddr(_, info)
            | Expr::Real(_, info)
            | Expr::Imag(_, info)
            | Expr::Constant(_, info)
            | Expr::VaArg(_, _, info)
            | Expr::Offsetof(_, _, info)
            | Expr::TypesCompatible(_, _, info) => info,
            Expr::Ident(ident) => &ident.info,
        }
    }
}

impl Stmt {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Stmt::Labeled { info, .. }
            | Stmt::Case { info, .. }
            | Stmt::CaseRange { info, .. }
            | Stmt::Default { info, .. }
            | Stmt::Expr { info, .. }
            | Stmt::If { info, .. }
            | Stmt::Switch { info, .. }
            | Stmt::While { info, .. }
            | Stmt::DoWhile { info, .. }
            | Stmt::For { info, .. }
            | Stmt::Goto { info, .. }
            | Stmt::GotoExpr { info, .. }
            | Stmt::Continue { info }
            | Stmt::Break { info }
            | Stmt::Return { info, .. } => info,
            Stmt::Compound(compound) => &compound.info,
            Stmt::Asm(asm) => &asm.info,
        }
    }
}

impl Declarator {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Declarator::Var(var) => &var.info,
            Declarator::Pointer(ptr) => &ptr.info,
            Declarator::Array(arr) => &arr.info,
            Declarator::Function(fun) => &fun.info,
        }
    }
}

impl DeclSpecifier {
    pub fn info(&self) -> &NodeInfo {
        match self {
            DeclSpecifier::Storage(_, info) => info,
            DeclSpecifier::Qualifier(qual) => qual.info(),
            DeclSpecifier::Type(spec) => spec.info(),
        }
    }
}

impl TypeQualifier {
    pub fn info(&self) -> &NodeInfo {
        match self {
            TypeQualifier::Const(info)
            | TypeQualifier::Volatile(info)
            | TypeQualifier::Restrict(info)
            | TypeQualifier::Inline(info) => info,
            TypeQualifier::Attribute(attr) => &attr.info,
        }
    }
}

impl TypeSpecifier {
    pub fn info(&self) -> &NodeInfo {
        match self {
            TypeSpecifier::Void(info)
            | TypeSpecifier::Char(info)
            | TypeSpecifier::Short(info)
            | TypeSpecifier::Int(info)
            | TypeSpecifier::Long(info)
            | TypeSpecifier::Float(info)
            | TypeSpecifier::Double(info)
            | TypeSpecifier::Signed(info)
            | TypeSpecifier::Unsigned(info)
            | TypeSpecifier::Bool(info)
            | TypeSpecifier::Complex(info)
            | TypeSpecifier::TypeofExpr(_, info)
            | TypeSpecifier::TypeofType(_, info) => info,
            TypeSpecifier::Record(record) => &record.info,
            TypeSpecifier::Enum(spec) => &spec.info,
            TypeSpecifier::TypedefName(ident) => &ident.info,
        }
    }
}

impl ExternalDecl {
    pub fn info(&self) -> &NodeInfo {
        match self {
            ExternalDecl::FunctionDef(def) => &def.info,
            ExternalDecl::Declaration(decl) => &decl.info,
            ExternalDecl::Asm(asm) => &asm.info,
        }
    }
}

macro_rules! impl_has_pos_via_info_method {
    ($($ty:ty),* $(,)?) => {
        $(impl HasPos for $ty {
            fn pos(&self) -> Pos {
                self.info().pos
            }
        })*
    };
}

macro_rules! impl_has_pos_via_info_field {
    ($($ty:ty),* $(,)?) => {
        $(impl HasPos for $ty {
            fn pos(&self) -> Pos {
                self.info.pos
            }
        })*
    };
}

impl_has_pos_via_info_method!(Expr, Stmt, Declarator, DeclSpecifier, TypeQualifier, TypeSpecifier, ExternalDecl);

impl_has_pos_via_info_field!(
    Attribute,
    TranslationUnit,
    FunctionDef,
    Declaration,
    RecordSpecifier,
    EnumSpecifier,
    VarDeclarator,
    AsmName,
    ParamDecl,
    TypeName,
    CompoundStmt,
    AsmStmt,
    InitList,
);

impl HasPos for Initializer {
    fn pos(&self) -> Pos {
        match self {
            Initializer::Expr(expr) => expr.pos(),
            Initializer::List(list) => list.info.pos,
        }
    }
}

impl HasPos for Designator {
    fn pos(&self) -> Pos {
        match self {
            Designator::Index(_, info) | Designator::Range(_, _, info) => info.pos,
            Designator::Member(ident) => ident.info.pos,
        }
    }
}

impl HasPos for BlockItem {
    fn pos(&self) -> Pos {
        match self {
            BlockItem::Declaration(decl) => decl.pos(),
            BlockItem::Statement(stmt) => stmt.pos(),
            BlockItem::NestedFunction(def) => def.pos(),
        }
    }
}
