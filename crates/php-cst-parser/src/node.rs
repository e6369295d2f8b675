//! CST node definitions.
//!
//! One tagged `Node` union with a variant per grammar production, plus the
//! three sentinel variants (`TokenNode`, `SkippedNode`, `MissingNode`) that
//! make the tree lossless under error recovery. Every node owns its
//! children; the root `SourceFile` therefore owns the whole tree and there
//! are no cycles. Ancestors are recomputed by walking from the root — the
//! serialized form never contains parent links.
//!
//! `Node::slots` enumerates each node's children (tokens and nodes) in
//! source order; it drives the round-trip reconstruction and the tree
//! walks.

use php_cst_lexer::{Token, TokenKind};

/// One child slot, in source order: either a token stored directly on the
/// node, or a child node.
pub enum Slot<'a> {
    Token(&'a Token),
    Node(&'a Node),
}

/// A CST node. Variants are grouped: sentinels, delimited lists,
/// expressions, statements, declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // sentinels
    TokenNode(TokenNode),
    SkippedNode(SkippedNode),
    MissingNode(MissingNode),

    // delimited lists (one shape, distinct grammatical tags)
    ExpressionList(DelimitedList),
    ConstElementList(DelimitedList),
    ParameterDeclarationList(DelimitedList),
    UseVariableNameList(DelimitedList),
    QualifiedNameList(DelimitedList),
    ArrayElementList(DelimitedList),
    ListExpressionList(DelimitedList),
    ArgumentExpressionList(DelimitedList),
    NamespaceUseClauseList(DelimitedList),
    NamespaceUseGroupClauseList(DelimitedList),
    TraitSelectOrAliasClauseList(DelimitedList),
    StaticVariableNameList(DelimitedList),
    VariableNameList(DelimitedList),

    // expressions
    UnaryOpExpression(Box<UnaryOpExpression>),
    ErrorControlExpression(Box<ErrorControlExpression>),
    PrefixUpdateExpression(Box<PrefixUpdateExpression>),
    PostfixUpdateExpression(Box<PostfixUpdateExpression>),
    BinaryExpression(Box<BinaryExpression>),
    AssignmentExpression(Box<AssignmentExpression>),
    TernaryExpression(Box<TernaryExpression>),
    CastExpression(Box<CastExpression>),
    ObjectCreationExpression(Box<ObjectCreationExpression>),
    CloneExpression(Box<CloneExpression>),
    YieldExpression(Box<YieldExpression>),
    ScriptInclusionExpression(Box<ScriptInclusionExpression>),
    Variable(Box<Variable>),
    BracedExpression(Box<BracedExpression>),
    QualifiedName(Box<QualifiedName>),
    RelativeSpecifier(Box<RelativeSpecifier>),
    NumericLiteral(Box<NumericLiteral>),
    StringLiteral(Box<StringLiteral>),
    ReservedWord(Box<ReservedWord>),
    ArrayCreationExpression(Box<ArrayCreationExpression>),
    ArrayElement(Box<ArrayElement>),
    EchoExpression(Box<EchoExpression>),
    ListIntrinsicExpression(Box<ListIntrinsicExpression>),
    UnsetIntrinsicExpression(Box<UnsetIntrinsicExpression>),
    EmptyIntrinsicExpression(Box<EmptyIntrinsicExpression>),
    EvalIntrinsicExpression(Box<EvalIntrinsicExpression>),
    ExitIntrinsicExpression(Box<ExitIntrinsicExpression>),
    IssetIntrinsicExpression(Box<IssetIntrinsicExpression>),
    PrintIntrinsicExpression(Box<PrintIntrinsicExpression>),
    ParenthesizedExpression(Box<ParenthesizedExpression>),
    AnonymousFunctionCreationExpression(Box<AnonymousFunctionCreationExpression>),
    AnonymousFunctionUseClause(Box<AnonymousFunctionUseClause>),
    UseVariableName(Box<UseVariableName>),
    SubscriptExpression(Box<SubscriptExpression>),
    MemberAccessExpression(Box<MemberAccessExpression>),
    ScopedPropertyAccessExpression(Box<ScopedPropertyAccessExpression>),
    CallExpression(Box<CallExpression>),
    ArgumentExpression(Box<ArgumentExpression>),
    Parameter(Box<Parameter>),

    // statements
    InlineHtml(Box<InlineHtml>),
    CompoundStatement(Box<CompoundStatement>),
    ExpressionStatement(Box<ExpressionStatement>),
    EmptyStatement(Box<EmptyStatement>),
    NamedLabelStatement(Box<NamedLabelStatement>),
    IfStatement(Box<IfStatement>),
    ElseIfClause(Box<ElseIfClause>),
    ElseClause(Box<ElseClause>),
    SwitchStatement(Box<SwitchStatement>),
    CaseStatement(Box<CaseStatement>),
    WhileStatement(Box<WhileStatement>),
    DoStatement(Box<DoStatement>),
    ForStatement(Box<ForStatement>),
    ForeachStatement(Box<ForeachStatement>),
    ForeachKey(Box<ForeachKey>),
    ForeachValue(Box<ForeachValue>),
    GotoStatement(Box<GotoStatement>),
    BreakOrContinueStatement(Box<BreakOrContinueStatement>),
    ReturnStatement(Box<ReturnStatement>),
    ThrowStatement(Box<ThrowStatement>),
    TryStatement(Box<TryStatement>),
    CatchClause(Box<CatchClause>),
    FinallyClause(Box<FinallyClause>),
    DeclareStatement(Box<DeclareStatement>),
    DeclareDirective(Box<DeclareDirective>),

    // declarations
    FunctionDeclaration(Box<FunctionDeclaration>),
    MethodDeclaration(Box<MethodDeclaration>),
    ClassDeclaration(Box<ClassDeclaration>),
    ClassMembers(Box<ClassMembers>),
    ClassBaseClause(Box<ClassBaseClause>),
    ClassInterfaceClause(Box<ClassInterfaceClause>),
    ClassConstDeclaration(Box<ClassConstDeclaration>),
    ConstDeclaration(Box<ConstDeclaration>),
    ConstElement(Box<ConstElement>),
    PropertyDeclaration(Box<PropertyDeclaration>),
    MissingMemberDeclaration(Box<MissingMemberDeclaration>),
    InterfaceDeclaration(Box<InterfaceDeclaration>),
    InterfaceMembers(Box<InterfaceMembers>),
    InterfaceBaseClause(Box<InterfaceBaseClause>),
    TraitDeclaration(Box<TraitDeclaration>),
    TraitMembers(Box<TraitMembers>),
    TraitUseClause(Box<TraitUseClause>),
    TraitSelectOrAliasClause(Box<TraitSelectOrAliasClause>),
    NamespaceDefinition(Box<NamespaceDefinition>),
    NamespaceUseDeclaration(Box<NamespaceUseDeclaration>),
    NamespaceUseClause(Box<NamespaceUseClause>),
    NamespaceUseGroupClause(Box<NamespaceUseGroupClause>),
    NamespaceAliasingClause(Box<NamespaceAliasingClause>),
    GlobalDeclaration(Box<GlobalDeclaration>),
    FunctionStaticDeclaration(Box<FunctionStaticDeclaration>),
    StaticVariableDeclaration(Box<StaticVariableDeclaration>),
}

// ── sentinels ───────────────────────────────────────────────────────────

/// Wraps a lone token so a node-typed slot can hold it.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    pub token: Token,
}

/// A real token the parser could not place; its bytes still count.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedNode {
    pub token: Token,
}

/// Stands in for a whole required construct that was absent. The token
/// carries the expected kind and has zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingNode {
    pub token: Token,
}

impl Node {
    pub fn token(token: Token) -> Node {
        Node::TokenNode(TokenNode { token })
    }

    pub fn skipped(from: Token) -> Node {
        Node::SkippedNode(SkippedNode {
            token: from.into_skipped(),
        })
    }

    pub fn missing(kind: TokenKind, full_start: usize) -> Node {
        Node::MissingNode(MissingNode {
            token: Token::missing(kind, full_start),
        })
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::MissingNode(_))
    }
}

// ── delimited lists ─────────────────────────────────────────────────────

/// Interleaved `[elem, delim, elem, delim, ...]`; delimiters are
/// `TokenNode`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DelimitedList {
    pub children: Vec<Node>,
}

// ── expressions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOpExpression {
    pub operator: Token,
    pub operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorControlExpression {
    pub operator: Token,
    pub operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixUpdateExpression {
    pub increment_or_decrement_operator: Token,
    pub operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixUpdateExpression {
    pub operand: Node,
    pub increment_or_decrement_operator: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left_operand: Node,
    pub operator: Token,
    pub right_operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub left_operand: Node,
    pub operator: Token,
    pub by_ref: Option<Token>,
    pub right_operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpression {
    pub condition: Node,
    pub question_token: Token,
    pub if_expression: Option<Node>,
    pub colon_token: Token,
    pub else_expression: Node,
}

/// Covers both the single-token cast (`(int)`, from the lexer) and the
/// granular `(` reserved-word `)` form recognized by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpression {
    pub open_paren: Option<Token>,
    pub cast_type: Token,
    pub close_paren: Option<Token>,
    pub operand: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCreationExpression {
    pub new_keyword: Token,
    pub class_type_designator: Node,
    pub open_paren: Option<Token>,
    pub argument_expression_list: Option<Node>,
    pub close_paren: Option<Token>,
    pub class_base_clause: Option<Node>,
    pub class_interface_clause: Option<Node>,
    pub class_members: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloneExpression {
    pub clone_keyword: Token,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpression {
    pub yield_or_yield_from_keyword: Token,
    pub array_element: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInclusionExpression {
    pub require_or_include_keyword: Token,
    pub expression: Node,
}

/// `$name`, `$$name`, `${expr}`; `name` is a `TokenNode`, a nested
/// `Variable`, a `BracedExpression`, or a `MissingNode`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub dollar: Option<Token>,
    pub name: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracedExpression {
    pub open_brace: Token,
    pub expression: Node,
    pub close_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub relative_specifier: Option<Node>,
    pub global_specifier: Option<Token>,
    pub name_parts: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeSpecifier {
    pub namespace_keyword: Token,
    pub backslash: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    pub children: Token,
}

/// String literals in all their shapes. The single-token form has no
/// quote tokens and one `TokenNode` child; template forms hold the quote
/// (or heredoc) tokens and the interleaved parts.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub start_quote: Option<Token>,
    pub children: Vec<Node>,
    pub end_quote: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservedWord {
    pub children: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayCreationExpression {
    pub array_keyword: Option<Token>,
    pub open_paren_or_bracket: Token,
    pub array_elements: Option<Node>,
    pub close_paren_or_bracket: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayElement {
    pub by_ref: Option<Token>,
    pub element_key: Option<Node>,
    pub arrow_token: Option<Token>,
    pub element_value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EchoExpression {
    pub echo_keyword: Token,
    pub expressions: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListIntrinsicExpression {
    pub list_keyword: Token,
    pub open_paren: Token,
    pub list_elements: Option<Node>,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnsetIntrinsicExpression {
    pub unset_keyword: Token,
    pub open_paren: Token,
    pub expressions: Option<Node>,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyIntrinsicExpression {
    pub empty_keyword: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalIntrinsicExpression {
    pub eval_keyword: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitIntrinsicExpression {
    pub exit_or_die_keyword: Token,
    pub open_paren: Option<Token>,
    pub expression: Option<Node>,
    pub close_paren: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssetIntrinsicExpression {
    pub isset_keyword: Token,
    pub open_paren: Token,
    pub expressions: Option<Node>,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintIntrinsicExpression {
    pub print_keyword: Token,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousFunctionCreationExpression {
    pub static_modifier: Option<Token>,
    pub header: FunctionHeader,
    pub anonymous_function_use_clause: Option<Node>,
    pub return_type: FunctionReturnType,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousFunctionUseClause {
    pub use_keyword: Token,
    pub open_paren: Token,
    pub use_variable_name_list: Option<Node>,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseVariableName {
    pub by_ref: Option<Token>,
    pub variable_name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpression {
    pub postfix_expression: Node,
    pub open_bracket_or_brace: Token,
    pub access_expression: Option<Node>,
    pub close_bracket_or_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessExpression {
    pub dereferencable_expression: Node,
    pub arrow_token: Token,
    pub member_name: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopedPropertyAccessExpression {
    pub scope_resolution_qualifier: Node,
    pub double_colon: Token,
    pub member_name: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callable_expression: Node,
    pub open_paren: Token,
    pub argument_expression_list: Option<Node>,
    pub close_paren: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentExpression {
    pub by_ref_token: Option<Token>,
    pub dot_dot_dot_token: Option<Token>,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub question_token: Option<Token>,
    pub type_declaration: Option<Node>,
    pub by_ref_token: Option<Token>,
    pub dot_dot_dot_token: Option<Token>,
    pub variable_name: Token,
    pub equals_token: Option<Token>,
    pub default: Option<Node>,
}

// ── function-like composition ───────────────────────────────────────────

/// `function [&] name ( parameters )` — shared by function declarations,
/// methods and anonymous functions.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader {
    pub function_keyword: Token,
    pub by_ref_token: Option<Token>,
    pub name: Option<Node>,
    pub open_paren: Token,
    pub parameters: Option<Node>,
    pub close_paren: Token,
}

/// `: [?] type` — absent entirely when no colon follows the parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionReturnType {
    pub colon_token: Option<Token>,
    pub question_token: Option<Token>,
    pub return_type: Option<Node>,
}

/// A compound statement, or for abstract methods a lone semicolon
/// wrapped in a `TokenNode`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub compound_statement_or_semicolon: Node,
}

// ── statements ──────────────────────────────────────────────────────────

/// A `?> ... <?php` island inside statement context. Any of the three
/// pieces may be absent (start of file, end of file).
#[derive(Debug, Clone, PartialEq)]
pub struct InlineHtml {
    pub script_section_end_tag: Option<Token>,
    pub text: Option<Token>,
    pub script_section_start_tag: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStatement {
    pub open_brace: Token,
    pub statements: Vec<Node>,
    pub close_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Vec<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStatement {
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedLabelStatement {
    pub name: Token,
    pub colon: Token,
    pub statement: Node,
}

/// Both the `{}` and the `: ... endif;` forms. In the brace-less form
/// `statements` holds the single body statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub if_keyword: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
    pub else_if_clauses: Vec<Node>,
    pub else_clause: Option<Node>,
    pub endif_keyword: Option<Token>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfClause {
    pub else_if_keyword: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseClause {
    pub else_keyword: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub switch_keyword: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
    pub open_brace: Option<Token>,
    pub colon: Option<Token>,
    pub case_statements: Vec<Node>,
    pub close_brace: Option<Token>,
    pub endswitch: Option<Token>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseStatement {
    pub case_keyword: Token,
    pub expression: Option<Node>,
    pub default_label_terminator: Token,
    pub statement_list: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub while_token: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
    pub end_while: Option<Token>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoStatement {
    pub do_keyword: Token,
    pub statement: Node,
    pub while_token: Token,
    pub open_paren: Token,
    pub expression: Node,
    pub close_paren: Token,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub for_keyword: Token,
    pub open_paren: Token,
    pub for_initializer: Option<Node>,
    pub expr_group_semicolon1: Token,
    pub for_control: Option<Node>,
    pub expr_group_semicolon2: Token,
    pub for_end_of_loop: Option<Node>,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
    pub end_for: Option<Token>,
    pub end_for_semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStatement {
    pub foreach: Token,
    pub open_paren: Token,
    pub for_each_collection_name: Node,
    pub as_keyword: Token,
    pub foreach_key: Option<Node>,
    pub foreach_value: Node,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
    pub end_foreach: Option<Token>,
    pub end_foreach_semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachKey {
    pub expression: Node,
    pub arrow: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachValue {
    pub ampersand: Option<Token>,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GotoStatement {
    pub goto_keyword: Token,
    pub name: Token,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakOrContinueStatement {
    pub break_or_continue_keyword: Token,
    pub breakout_level: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub return_keyword: Token,
    pub expression: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub throw_keyword: Token,
    pub expression: Node,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub try_keyword: Token,
    pub compound_statement: Node,
    pub catch_clauses: Vec<Node>,
    pub finally_clause: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub catch: Token,
    pub open_paren: Token,
    pub qualified_name: Option<Node>,
    pub variable_name: Token,
    pub close_paren: Token,
    pub compound_statement: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinallyClause {
    pub finally_token: Token,
    pub compound_statement: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareStatement {
    pub declare_keyword: Token,
    pub open_paren: Token,
    pub declare_directive: Node,
    pub close_paren: Token,
    pub colon: Option<Token>,
    pub statements: Vec<Node>,
    pub enddeclare_keyword: Option<Token>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareDirective {
    pub name: Token,
    pub equals: Token,
    pub literal: Token,
}

// ── declarations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub header: FunctionHeader,
    pub return_type: FunctionReturnType,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub modifiers: Vec<Token>,
    pub header: FunctionHeader,
    pub return_type: FunctionReturnType,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub abstract_or_final_modifier: Option<Token>,
    pub class_keyword: Token,
    pub name: Token,
    pub class_base_clause: Option<Node>,
    pub class_interface_clause: Option<Node>,
    pub class_members: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMembers {
    pub open_brace: Token,
    pub class_member_declarations: Vec<Node>,
    pub close_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassBaseClause {
    pub extends_keyword: Token,
    pub base_class: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassInterfaceClause {
    pub implements_keyword: Token,
    pub interface_name_list: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstDeclaration {
    pub modifiers: Vec<Token>,
    pub const_keyword: Token,
    pub const_elements: Option<Node>,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDeclaration {
    pub const_keyword: Token,
    pub const_elements: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstElement {
    pub name: Token,
    pub equals_token: Token,
    pub assignment: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDeclaration {
    pub modifiers: Vec<Token>,
    pub property_elements: Option<Node>,
    pub semicolon: Token,
}

/// A run of modifiers not followed by anything a class/trait/interface
/// body knows how to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingMemberDeclaration {
    pub modifiers: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub interface_keyword: Token,
    pub name: Token,
    pub interface_base_clause: Option<Node>,
    pub interface_members: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceMembers {
    pub open_brace: Token,
    pub interface_member_declarations: Vec<Node>,
    pub close_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceBaseClause {
    pub extends_keyword: Token,
    pub interface_name_list: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDeclaration {
    pub trait_keyword: Token,
    pub name: Token,
    pub trait_members: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitMembers {
    pub open_brace: Token,
    pub trait_member_declarations: Vec<Node>,
    pub close_brace: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitUseClause {
    pub use_keyword: Token,
    pub trait_name_list: Option<Node>,
    pub semicolon_or_open_brace: Token,
    pub trait_select_and_alias_clauses: Option<Node>,
    pub close_brace: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitSelectOrAliasClause {
    pub name: Option<Node>,
    pub as_or_instead_of_keyword: Token,
    pub modifiers: Vec<Token>,
    pub target_name: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDefinition {
    pub namespace_keyword: Token,
    pub name: Option<Node>,
    pub compound_statement_or_semicolon: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceUseDeclaration {
    pub use_keyword: Token,
    pub function_or_const: Option<Token>,
    pub use_clauses: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceUseClause {
    pub namespace_name: Option<Node>,
    pub namespace_aliasing_clause: Option<Node>,
    pub open_brace: Option<Token>,
    pub group_clauses: Option<Node>,
    pub close_brace: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceUseGroupClause {
    pub function_or_const: Option<Token>,
    pub namespace_name: Option<Node>,
    pub namespace_aliasing_clause: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceAliasingClause {
    pub as_keyword: Token,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDeclaration {
    pub global_keyword: Token,
    pub variable_name_list: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStaticDeclaration {
    pub static_keyword: Token,
    pub static_variable_name_list: Option<Node>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticVariableDeclaration {
    pub variable_name: Token,
    pub equals_token: Option<Token>,
    pub assignment: Option<Node>,
}

// ── root ────────────────────────────────────────────────────────────────

/// The parse root. Owns the source text, the top-level statements and the
/// terminating EOF token.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_contents: String,
    pub uri: Option<String>,
    pub statement_list: Vec<Node>,
    pub end_of_file_token: Token,
}

impl SourceFile {
    /// All tokens of the tree in source (pre-order) order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        for statement in &self.statement_list {
            collect_tokens(statement, &mut out);
        }
        out.push(&self.end_of_file_token);
        out
    }

    /// Concatenated full text of every token: equals the original source.
    pub fn reconstruct(&self) -> String {
        let mut out = String::with_capacity(self.file_contents.len());
        for token in self.tokens() {
            out.push_str(token.full_text(&self.file_contents));
        }
        out
    }

    /// Pre-order walk yielding each node with its parent (`None` for the
    /// top-level statements).
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(Option<&'a Node>, &'a Node)) {
        for statement in &self.statement_list {
            f(None, statement);
            walk_children(statement, f);
        }
    }
}

fn collect_tokens<'a>(node: &'a Node, out: &mut Vec<&'a Token>) {
    for slot in node.slots() {
        match slot {
            Slot::Token(token) => out.push(token),
            Slot::Node(child) => collect_tokens(child, out),
        }
    }
}

fn walk_children<'a>(node: &'a Node, f: &mut impl FnMut(Option<&'a Node>, &'a Node)) {
    for slot in node.slots() {
        if let Slot::Node(child) = slot {
            f(Some(node), child);
            walk_children(child, f);
        }
    }
}

// slot-collection helpers: each pushes in source order
trait SlotSink<'a> {
    fn tok(&mut self, t: &'a Token);
    fn opt_tok(&mut self, t: &'a Option<Token>);
    fn toks(&mut self, ts: &'a [Token]);
    fn node(&mut self, n: &'a Node);
    fn opt_node(&mut self, n: &'a Option<Node>);
    fn nodes(&mut self, ns: &'a [Node]);
}

impl<'a> SlotSink<'a> for Vec<Slot<'a>> {
    fn tok(&mut self, t: &'a Token) {
        self.push(Slot::Token(t));
    }
    fn opt_tok(&mut self, t: &'a Option<Token>) {
        if let Some(t) = t {
            self.push(Slot::Token(t));
        }
    }
    fn toks(&mut self, ts: &'a [Token]) {
        for t in ts {
            self.push(Slot::Token(t));
        }
    }
    fn node(&mut self, n: &'a Node) {
        self.push(Slot::Node(n));
    }
    fn opt_node(&mut self, n: &'a Option<Node>) {
        if let Some(n) = n {
            self.push(Slot::Node(n));
        }
    }
    fn nodes(&mut self, ns: &'a [Node]) {
        for n in ns {
            self.push(Slot::Node(n));
        }
    }
}

fn function_header_slots<'a>(header: &'a FunctionHeader, s: &mut Vec<Slot<'a>>) {
    s.tok(&header.function_keyword);
    s.opt_tok(&header.by_ref_token);
    s.opt_node(&header.name);
    s.tok(&header.open_paren);
    s.opt_node(&header.parameters);
    s.tok(&header.close_paren);
}

fn return_type_slots<'a>(rt: &'a FunctionReturnType, s: &mut Vec<Slot<'a>>) {
    s.opt_tok(&rt.colon_token);
    s.opt_tok(&rt.question_token);
    s.opt_node(&rt.return_type);
}

impl Node {
    /// This node's direct children — tokens and nodes — in source order.
    pub fn slots(&self) -> Vec<Slot<'_>> {
        let mut s: Vec<Slot<'_>> = Vec::new();
        match self {
            Node::TokenNode(n) => s.tok(&n.token),
            Node::SkippedNode(n) => s.tok(&n.token),
            Node::MissingNode(n) => s.tok(&n.token),

            Node::ExpressionList(n)
            | Node::ConstElementList(n)
            | Node::ParameterDeclarationList(n)
            | Node::UseVariableNameList(n)
            | Node::QualifiedNameList(n)
            | Node::ArrayElementList(n)
            | Node::ListExpressionList(n)
            | Node::ArgumentExpressionList(n)
            | Node::NamespaceUseClauseList(n)
            | Node::NamespaceUseGroupClauseList(n)
            | Node::TraitSelectOrAliasClauseList(n)
            | Node::StaticVariableNameList(n)
            | Node::VariableNameList(n) => s.nodes(&n.children),

            Node::UnaryOpExpression(n) => {
                s.tok(&n.operator);
                s.node(&n.operand);
            }
            Node::ErrorControlExpression(n) => {
                s.tok(&n.operator);
                s.node(&n.operand);
            }
            Node::PrefixUpdateExpression(n) => {
                s.tok(&n.increment_or_decrement_operator);
                s.node(&n.operand);
            }
            Node::PostfixUpdateExpression(n) => {
                s.node(&n.operand);
                s.tok(&n.increment_or_decrement_operator);
            }
            Node::BinaryExpression(n) => {
                s.node(&n.left_operand);
                s.tok(&n.operator);
                s.node(&n.right_operand);
            }
            Node::AssignmentExpression(n) => {
                s.node(&n.left_operand);
                s.tok(&n.operator);
                s.opt_tok(&n.by_ref);
                s.node(&n.right_operand);
            }
            Node::TernaryExpression(n) => {
                s.node(&n.condition);
                s.tok(&n.question_token);
                s.opt_node(&n.if_expression);
                s.tok(&n.colon_token);
                s.node(&n.else_expression);
            }
            Node::CastExpression(n) => {
                s.opt_tok(&n.open_paren);
                s.tok(&n.cast_type);
                s.opt_tok(&n.close_paren);
                s.node(&n.operand);
            }
            Node::ObjectCreationExpression(n) => {
                s.tok(&n.new_keyword);
                s.node(&n.class_type_designator);
                s.opt_tok(&n.open_paren);
                s.opt_node(&n.argument_expression_list);
                s.opt_tok(&n.close_paren);
                s.opt_node(&n.class_base_clause);
                s.opt_node(&n.class_interface_clause);
                s.opt_node(&n.class_members);
            }
            Node::CloneExpression(n) => {
                s.tok(&n.clone_keyword);
                s.node(&n.expression);
            }
            Node::YieldExpression(n) => {
                s.tok(&n.yield_or_yield_from_keyword);
                s.node(&n.array_element);
            }
            Node::ScriptInclusionExpression(n) => {
                s.tok(&n.require_or_include_keyword);
                s.node(&n.expression);
            }
            Node::Variable(n) => {
                s.opt_tok(&n.dollar);
                s.node(&n.name);
            }
            Node::BracedExpression(n) => {
                s.tok(&n.open_brace);
                s.node(&n.expression);
                s.tok(&n.close_brace);
            }
            Node::QualifiedName(n) => {
                s.opt_node(&n.relative_specifier);
                s.opt_tok(&n.global_specifier);
                s.nodes(&n.name_parts);
            }
            Node::RelativeSpecifier(n) => {
                s.tok(&n.namespace_keyword);
                s.tok(&n.backslash);
            }
            Node::NumericLiteral(n) => s.tok(&n.children),
            Node::StringLiteral(n) => {
                s.opt_tok(&n.start_quote);
                s.nodes(&n.children);
                s.opt_tok(&n.end_quote);
            }
            Node::ReservedWord(n) => s.tok(&n.children),
            Node::ArrayCreationExpression(n) => {
                s.opt_tok(&n.array_keyword);
                s.tok(&n.open_paren_or_bracket);
                s.opt_node(&n.array_elements);
                s.tok(&n.close_paren_or_bracket);
            }
            Node::ArrayElement(n) => {
                s.opt_node(&n.element_key);
                s.opt_tok(&n.arrow_token);
                s.opt_tok(&n.by_ref);
                s.node(&n.element_value);
            }
            Node::EchoExpression(n) => {
                s.tok(&n.echo_keyword);
                s.opt_node(&n.expressions);
            }
            Node::ListIntrinsicExpression(n) => {
                s.tok(&n.list_keyword);
                s.tok(&n.open_paren);
                s.opt_node(&n.list_elements);
                s.tok(&n.close_paren);
            }
            Node::UnsetIntrinsicExpression(n) => {
                s.tok(&n.unset_keyword);
                s.tok(&n.open_paren);
                s.opt_node(&n.expressions);
                s.tok(&n.close_paren);
            }
            Node::EmptyIntrinsicExpression(n) => {
                s.tok(&n.empty_keyword);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
            }
            Node::EvalIntrinsicExpression(n) => {
                s.tok(&n.eval_keyword);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
            }
            Node::ExitIntrinsicExpression(n) => {
                s.tok(&n.exit_or_die_keyword);
                s.opt_tok(&n.open_paren);
                s.opt_node(&n.expression);
                s.opt_tok(&n.close_paren);
            }
            Node::IssetIntrinsicExpression(n) => {
                s.tok(&n.isset_keyword);
                s.tok(&n.open_paren);
                s.opt_node(&n.expressions);
                s.tok(&n.close_paren);
            }
            Node::PrintIntrinsicExpression(n) => {
                s.tok(&n.print_keyword);
                s.node(&n.expression);
            }
            Node::ParenthesizedExpression(n) => {
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
            }
            Node::AnonymousFunctionCreationExpression(n) => {
                s.opt_tok(&n.static_modifier);
                function_header_slots(&n.header, &mut s);
                s.opt_node(&n.anonymous_function_use_clause);
                return_type_slots(&n.return_type, &mut s);
                s.node(&n.body.compound_statement_or_semicolon);
            }
            Node::AnonymousFunctionUseClause(n) => {
                s.tok(&n.use_keyword);
                s.tok(&n.open_paren);
                s.opt_node(&n.use_variable_name_list);
                s.tok(&n.close_paren);
            }
            Node::UseVariableName(n) => {
                s.opt_tok(&n.by_ref);
                s.tok(&n.variable_name);
            }
            Node::SubscriptExpression(n) => {
                s.node(&n.postfix_expression);
                s.tok(&n.open_bracket_or_brace);
                s.opt_node(&n.access_expression);
                s.tok(&n.close_bracket_or_brace);
            }
            Node::MemberAccessExpression(n) => {
                s.node(&n.dereferencable_expression);
                s.tok(&n.arrow_token);
                s.node(&n.member_name);
            }
            Node::ScopedPropertyAccessExpression(n) => {
                s.node(&n.scope_resolution_qualifier);
                s.tok(&n.double_colon);
                s.node(&n.member_name);
            }
            Node::CallExpression(n) => {
                s.node(&n.callable_expression);
                s.tok(&n.open_paren);
                s.opt_node(&n.argument_expression_list);
                s.tok(&n.close_paren);
            }
            Node::ArgumentExpression(n) => {
                s.opt_tok(&n.by_ref_token);
                s.opt_tok(&n.dot_dot_dot_token);
                s.node(&n.expression);
            }
            Node::Parameter(n) => {
                s.opt_tok(&n.question_token);
                s.opt_node(&n.type_declaration);
                s.opt_tok(&n.by_ref_token);
                s.opt_tok(&n.dot_dot_dot_token);
                s.tok(&n.variable_name);
                s.opt_tok(&n.equals_token);
                s.opt_node(&n.default);
            }

            Node::InlineHtml(n) => {
                s.opt_tok(&n.script_section_end_tag);
                s.opt_tok(&n.text);
                s.opt_tok(&n.script_section_start_tag);
            }
            Node::CompoundStatement(n) => {
                s.tok(&n.open_brace);
                s.nodes(&n.statements);
                s.tok(&n.close_brace);
            }
            Node::ExpressionStatement(n) => {
                s.nodes(&n.expression);
                s.opt_tok(&n.semicolon);
            }
            Node::EmptyStatement(n) => s.tok(&n.semicolon),
            Node::NamedLabelStatement(n) => {
                s.tok(&n.name);
                s.tok(&n.colon);
                s.node(&n.statement);
            }
            Node::IfStatement(n) => {
                s.tok(&n.if_keyword);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
                s.nodes(&n.else_if_clauses);
                s.opt_node(&n.else_clause);
                s.opt_tok(&n.endif_keyword);
                s.opt_tok(&n.semicolon);
            }
            Node::ElseIfClause(n) => {
                s.tok(&n.else_if_keyword);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
            }
            Node::ElseClause(n) => {
                s.tok(&n.else_keyword);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
            }
            Node::SwitchStatement(n) => {
                s.tok(&n.switch_keyword);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
                s.opt_tok(&n.open_brace);
                s.opt_tok(&n.colon);
                s.nodes(&n.case_statements);
                s.opt_tok(&n.close_brace);
                s.opt_tok(&n.endswitch);
                s.opt_tok(&n.semicolon);
            }
            Node::CaseStatement(n) => {
                s.tok(&n.case_keyword);
                s.opt_node(&n.expression);
                s.tok(&n.default_label_terminator);
                s.nodes(&n.statement_list);
            }
            Node::WhileStatement(n) => {
                s.tok(&n.while_token);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
                s.opt_tok(&n.end_while);
                s.opt_tok(&n.semicolon);
            }
            Node::DoStatement(n) => {
                s.tok(&n.do_keyword);
                s.node(&n.statement);
                s.tok(&n.while_token);
                s.tok(&n.open_paren);
                s.node(&n.expression);
                s.tok(&n.close_paren);
                s.opt_tok(&n.semicolon);
            }
            Node::ForStatement(n) => {
                s.tok(&n.for_keyword);
                s.tok(&n.open_paren);
                s.opt_node(&n.for_initializer);
                s.tok(&n.expr_group_semicolon1);
                s.opt_node(&n.for_control);
                s.tok(&n.expr_group_semicolon2);
                s.opt_node(&n.for_end_of_loop);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
                s.opt_tok(&n.end_for);
                s.opt_tok(&n.end_for_semicolon);
            }
            Node::ForeachStatement(n) => {
                s.tok(&n.foreach);
                s.tok(&n.open_paren);
                s.node(&n.for_each_collection_name);
                s.tok(&n.as_keyword);
                s.opt_node(&n.foreach_key);
                s.node(&n.foreach_value);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
                s.opt_tok(&n.end_foreach);
                s.opt_tok(&n.end_foreach_semicolon);
            }
            Node::ForeachKey(n) => {
                s.node(&n.expression);
                s.tok(&n.arrow);
            }
            Node::ForeachValue(n) => {
                s.opt_tok(&n.ampersand);
                s.node(&n.expression);
            }
            Node::GotoStatement(n) => {
                s.tok(&n.goto_keyword);
                s.tok(&n.name);
                s.opt_tok(&n.semicolon);
            }
            Node::BreakOrContinueStatement(n) => {
                s.tok(&n.break_or_continue_keyword);
                s.opt_node(&n.breakout_level);
                s.opt_tok(&n.semicolon);
            }
            Node::ReturnStatement(n) => {
                s.tok(&n.return_keyword);
                s.opt_node(&n.expression);
                s.opt_tok(&n.semicolon);
            }
            Node::ThrowStatement(n) => {
                s.tok(&n.throw_keyword);
                s.node(&n.expression);
                s.opt_tok(&n.semicolon);
            }
            Node::TryStatement(n) => {
                s.tok(&n.try_keyword);
                s.node(&n.compound_statement);
                s.nodes(&n.catch_clauses);
                s.opt_node(&n.finally_clause);
            }
            Node::CatchClause(n) => {
                s.tok(&n.catch);
                s.tok(&n.open_paren);
                s.opt_node(&n.qualified_name);
                s.tok(&n.variable_name);
                s.tok(&n.close_paren);
                s.node(&n.compound_statement);
            }
            Node::FinallyClause(n) => {
                s.tok(&n.finally_token);
                s.node(&n.compound_statement);
            }
            Node::DeclareStatement(n) => {
                s.tok(&n.declare_keyword);
                s.tok(&n.open_paren);
                s.node(&n.declare_directive);
                s.tok(&n.close_paren);
                s.opt_tok(&n.colon);
                s.nodes(&n.statements);
                s.opt_tok(&n.enddeclare_keyword);
                s.opt_tok(&n.semicolon);
            }
            Node::DeclareDirective(n) => {
                s.tok(&n.name);
                s.tok(&n.equals);
                s.tok(&n.literal);
            }

            Node::FunctionDeclaration(n) => {
                function_header_slots(&n.header, &mut s);
                return_type_slots(&n.return_type, &mut s);
                s.node(&n.body.compound_statement_or_semicolon);
            }
            Node::MethodDeclaration(n) => {
                s.toks(&n.modifiers);
                function_header_slots(&n.header, &mut s);
                return_type_slots(&n.return_type, &mut s);
                s.node(&n.body.compound_statement_or_semicolon);
            }
            Node::ClassDeclaration(n) => {
                s.opt_tok(&n.abstract_or_final_modifier);
                s.tok(&n.class_keyword);
                s.tok(&n.name);
                s.opt_node(&n.class_base_clause);
                s.opt_node(&n.class_interface_clause);
                s.node(&n.class_members);
            }
            Node::ClassMembers(n) => {
                s.tok(&n.open_brace);
                s.nodes(&n.class_member_declarations);
                s.tok(&n.close_brace);
            }
            Node::ClassBaseClause(n) => {
                s.tok(&n.extends_keyword);
                s.opt_node(&n.base_class);
            }
            Node::ClassInterfaceClause(n) => {
                s.tok(&n.implements_keyword);
                s.opt_node(&n.interface_name_list);
            }
            Node::ClassConstDeclaration(n) => {
                s.toks(&n.modifiers);
                s.tok(&n.const_keyword);
                s.opt_node(&n.const_elements);
                s.tok(&n.semicolon);
            }
            Node::ConstDeclaration(n) => {
                s.tok(&n.const_keyword);
                s.opt_node(&n.const_elements);
                s.opt_tok(&n.semicolon);
            }
            Node::ConstElement(n) => {
                s.tok(&n.name);
                s.tok(&n.equals_token);
                s.node(&n.assignment);
            }
            Node::PropertyDeclaration(n) => {
                s.toks(&n.modifiers);
                s.opt_node(&n.property_elements);
                s.tok(&n.semicolon);
            }
            Node::MissingMemberDeclaration(n) => s.toks(&n.modifiers),
            Node::InterfaceDeclaration(n) => {
                s.tok(&n.interface_keyword);
                s.tok(&n.name);
                s.opt_node(&n.interface_base_clause);
                s.node(&n.interface_members);
            }
            Node::InterfaceMembers(n) => {
                s.tok(&n.open_brace);
                s.nodes(&n.interface_member_declarations);
                s.tok(&n.close_brace);
            }
            Node::InterfaceBaseClause(n) => {
                s.tok(&n.extends_keyword);
                s.opt_node(&n.interface_name_list);
            }
            Node::TraitDeclaration(n) => {
                s.tok(&n.trait_keyword);
                s.tok(&n.name);
                s.node(&n.trait_members);
            }
            Node::TraitMembers(n) => {
                s.tok(&n.open_brace);
                s.nodes(&n.trait_member_declarations);
                s.tok(&n.close_brace);
            }
            Node::TraitUseClause(n) => {
                s.tok(&n.use_keyword);
                s.opt_node(&n.trait_name_list);
                s.tok(&n.semicolon_or_open_brace);
                s.opt_node(&n.trait_select_and_alias_clauses);
                s.opt_tok(&n.close_brace);
            }
            Node::TraitSelectOrAliasClause(n) => {
                s.opt_node(&n.name);
                s.tok(&n.as_or_instead_of_keyword);
                s.toks(&n.modifiers);
                s.opt_node(&n.target_name);
            }
            Node::NamespaceDefinition(n) => {
                s.tok(&n.namespace_keyword);
                s.opt_node(&n.name);
                s.opt_node(&n.compound_statement_or_semicolon);
            }
            Node::NamespaceUseDeclaration(n) => {
                s.tok(&n.use_keyword);
                s.opt_tok(&n.function_or_const);
                s.opt_node(&n.use_clauses);
                s.opt_tok(&n.semicolon);
            }
            Node::NamespaceUseClause(n) => {
                s.opt_node(&n.namespace_name);
                s.opt_node(&n.namespace_aliasing_clause);
                s.opt_tok(&n.open_brace);
                s.opt_node(&n.group_clauses);
                s.opt_tok(&n.close_brace);
            }
            Node::NamespaceUseGroupClause(n) => {
                s.opt_tok(&n.function_or_const);
                s.opt_node(&n.namespace_name);
                s.opt_node(&n.namespace_aliasing_clause);
            }
            Node::NamespaceAliasingClause(n) => {
                s.tok(&n.as_keyword);
                s.tok(&n.name);
            }
            Node::GlobalDeclaration(n) => {
                s.tok(&n.global_keyword);
                s.opt_node(&n.variable_name_list);
                s.opt_tok(&n.semicolon);
            }
            Node::FunctionStaticDeclaration(n) => {
                s.tok(&n.static_keyword);
                s.opt_node(&n.static_variable_name_list);
                s.opt_tok(&n.semicolon);
            }
            Node::StaticVariableDeclaration(n) => {
                s.tok(&n.variable_name);
                s.opt_tok(&n.equals_token);
                s.opt_node(&n.assignment);
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use php_cst_lexer::TokenCategory;

    fn tok(kind: TokenKind, full_start: usize, start: usize, length: usize) -> Token {
        Token::new(kind, full_start, start, length)
    }

    #[test]
    fn test_sentinel_constructors() {
        let missing = Node::missing(TokenKind::SemicolonToken, 7);
        assert!(missing.is_missing());
        if let Node::MissingNode(n) = &missing {
            assert_eq!(n.token.length, 0);
            assert_eq!(n.token.category, TokenCategory::Missing);
        }

        let skipped = Node::skipped(tok(TokenKind::Unknown, 3, 3, 1));
        if let Node::SkippedNode(n) = &skipped {
            assert_eq!(n.token.category, TokenCategory::Skipped);
            assert_eq!(n.token.length, 1);
        } else {
            panic!("expected SkippedNode");
        }
    }

    #[test]
    fn test_slots_are_in_source_order() {
        // $a = 1  → Assignment(Variable($a), =, NumericLiteral(1))
        let node = Node::AssignmentExpression(Box::new(AssignmentExpression {
            left_operand: Node::Variable(Box::new(Variable {
                dollar: None,
                name: Node::token(tok(TokenKind::VariableName, 0, 0, 2)),
            })),
            operator: tok(TokenKind::EqualsToken, 2, 3, 2),
            by_ref: None,
            right_operand: Node::NumericLiteral(Box::new(NumericLiteral {
                children: tok(TokenKind::IntegerLiteralToken, 5, 6, 2),
            })),
        }));

        let mut tokens = Vec::new();
        super::collect_tokens(&node, &mut tokens);
        let offsets: Vec<usize> = tokens.iter().map(|t| t.full_start).collect();
        assert_eq!(offsets, vec![0, 2, 5]);
    }

    #[test]
    fn test_source_file_reconstruct() {
        let source = "<?php $a;";
        let file = SourceFile {
            file_contents: source.to_string(),
            uri: None,
            statement_list: vec![
                Node::InlineHtml(Box::new(InlineHtml {
                    script_section_end_tag: None,
                    text: None,
                    script_section_start_tag: Some(tok(
                        TokenKind::ScriptSectionStartTag,
                        0,
                        0,
                        6,
                    )),
                })),
                Node::ExpressionStatement(Box::new(ExpressionStatement {
                    expression: vec![Node::Variable(Box::new(Variable {
                        dollar: None,
                        name: Node::token(tok(TokenKind::VariableName, 6, 6, 2)),
                    }))],
                    semicolon: Some(tok(TokenKind::SemicolonToken, 8, 8, 1)),
                })),
            ],
            end_of_file_token: tok(TokenKind::EndOfFileToken, 9, 9, 0),
        };
        assert_eq!(file.reconstruct(), source);
    }

    #[test]
    fn test_walk_reports_parents() {
        let inner = Node::token(tok(TokenKind::VariableName, 0, 0, 2));
        let node = Node::ExpressionStatement(Box::new(ExpressionStatement {
            expression: vec![Node::Variable(Box::new(Variable {
                dollar: None,
                name: inner,
            }))],
            semicolon: None,
        }));
        let file = SourceFile {
            file_contents: "$a".to_string(),
            uri: None,
            statement_list: vec![node],
            end_of_file_token: tok(TokenKind::EndOfFileToken, 2, 2, 0),
        };

        let mut pairs = Vec::new();
        file.walk(&mut |parent, child| {
            pairs.push((
                parent.map(std::mem::discriminant),
                std::mem::discriminant(child),
            ));
        });
        // statement (no parent), variable (parent: statement), token node
        // (parent: variable)
        assert_eq!(pairs.len(), 3);
        assert!(pairs[0].0.is_none());
        assert!(pairs[1].0.is_some());
        assert!(pairs[2].0.is_some());
    }
}
