//! Tolerant recursive-descent parser.
//!
//! Consumes the lexed token stream through a one-token-lookahead cursor
//! and builds the CST bottom-up. Malformed input never aborts the parse:
//! required-but-absent tokens become zero-length missing tokens, and
//! tokens no active context can place become `SkippedNode`s, so the tree
//! always reconstitutes the source exactly.
//!
//! Error recovery pivots on the parse-context stack: `parse_list` skips a
//! token only when no *enclosing* list could use it, otherwise it stops
//! and lets the outer context continue.

use php_cst_lexer::{tables, tokenize, Token, TokenKind};

use crate::node::*;
use crate::precedence::{
    operator_precedence_and_associativity, Associativity, TERNARY_ELSE_PRECEDENCE,
};

/// Parses a whole source text. Always succeeds; errors are represented
/// in-tree.
pub fn parse_source_file(source: &str, uri: Option<&str>) -> SourceFile {
    let mut parser = Parser::new(source);
    let mut statement_list = Vec::new();
    if parser.token().kind != TokenKind::EndOfFileToken {
        statement_list.push(parser.parse_inline_html());
    }
    statement_list.extend(parser.parse_list(ParseContext::SourceElements));
    let end_of_file_token = parser.eat1(TokenKind::EndOfFileToken);
    SourceFile {
        file_contents: source.to_string(),
        uri: uri.map(str::to_string),
        statement_list,
        end_of_file_token,
    }
}

/// The list being built, for termination and recovery decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseContext {
    SourceElements = 0,
    BlockStatements,
    ClassMembers,
    IfClause2Elements,
    SwitchStatementElements,
    CaseStatementElements,
    WhileStatementElements,
    ForStatementElements,
    ForeachStatementElements,
    DeclareStatementElements,
    InterfaceMembers,
    TraitMembers,
}

const PARSE_CONTEXTS: [ParseContext; 12] = [
    ParseContext::SourceElements,
    ParseContext::BlockStatements,
    ParseContext::ClassMembers,
    ParseContext::IfClause2Elements,
    ParseContext::SwitchStatementElements,
    ParseContext::CaseStatementElements,
    ParseContext::WhileStatementElements,
    ParseContext::ForStatementElements,
    ParseContext::ForeachStatementElements,
    ParseContext::DeclareStatementElements,
    ParseContext::InterfaceMembers,
    ParseContext::TraitMembers,
];

/// One element of a multi-token lookahead pattern.
#[derive(Clone, Copy)]
enum Look<'a> {
    One(TokenKind),
    Any(&'a [TokenKind]),
    Pred(fn(TokenKind) -> bool),
}

const PARAMETER_TYPE_KINDS: [TokenKind; 7] = [
    TokenKind::ArrayKeyword,
    TokenKind::CallableKeyword,
    TokenKind::BoolReservedWord,
    TokenKind::FloatReservedWord,
    TokenKind::IntReservedWord,
    TokenKind::StringReservedWord,
    TokenKind::ObjectReservedWord,
];

const RETURN_TYPE_KINDS: [TokenKind; 8] = [
    TokenKind::VoidReservedWord,
    TokenKind::ArrayKeyword,
    TokenKind::CallableKeyword,
    TokenKind::BoolReservedWord,
    TokenKind::FloatReservedWord,
    TokenKind::IntReservedWord,
    TokenKind::StringReservedWord,
    TokenKind::ObjectReservedWord,
];

const GRANULAR_CAST_KINDS: [TokenKind; 12] = [
    TokenKind::ArrayKeyword,
    TokenKind::BinaryReservedWord,
    TokenKind::BoolReservedWord,
    TokenKind::BooleanReservedWord,
    TokenKind::DoubleReservedWord,
    TokenKind::IntReservedWord,
    TokenKind::IntegerReservedWord,
    TokenKind::FloatReservedWord,
    TokenKind::ObjectReservedWord,
    TokenKind::RealReservedWord,
    TokenKind::StringReservedWord,
    TokenKind::UnsetKeyword,
];

const CAST_TOKEN_KINDS: [TokenKind; 7] = [
    TokenKind::ArrayCastToken,
    TokenKind::BoolCastToken,
    TokenKind::DoubleCastToken,
    TokenKind::IntCastToken,
    TokenKind::ObjectCastToken,
    TokenKind::StringCastToken,
    TokenKind::UnsetCastToken,
];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof_index: usize,
    current_context: u32,
    parsing_object_creation: bool,
}

impl Parser {
    fn new(source: &str) -> Self {
        let tokens = tokenize(source);
        let eof_index = tokens.len() - 1;
        Parser {
            tokens,
            pos: 0,
            eof_index,
            current_context: 0,
            parsing_object_creation: false,
        }
    }

    // ── cursor primitives ───────────────────────────────────────────────

    fn token(&self) -> Token {
        self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos < self.eof_index {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.token().kind == kind
    }

    /// Consumes the current token when it matches, otherwise synthesizes a
    /// zero-length missing token of the expected kind without advancing.
    fn eat1(&mut self, kind: TokenKind) -> Token {
        let token = self.token();
        if token.kind == kind {
            self.advance();
            return token;
        }
        Token::missing(kind, token.full_start)
    }

    /// Like `eat1` over several acceptable kinds; the first kind is the
    /// missing-token fallback.
    fn eat_any(&mut self, kinds: &[TokenKind]) -> Token {
        let token = self.token();
        if kinds.contains(&token.kind) {
            self.advance();
            return token;
        }
        Token::missing(kinds[0], token.full_start)
    }

    fn eat_optional(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.token();
        if token.kind == kind {
            self.advance();
            return Some(token);
        }
        None
    }

    fn eat_optional_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let token = self.token();
        if kinds.contains(&token.kind) {
            self.advance();
            return Some(token);
        }
        None
    }

    /// Restartable lookahead over the tokens after the current one; never
    /// moves the cursor.
    fn lookahead(&self, steps: &[Look]) -> bool {
        for (i, step) in steps.iter().enumerate() {
            let idx = self.pos + 1 + i;
            if idx > self.eof_index {
                return false;
            }
            let kind = self.tokens[idx].kind;
            let matched = match step {
                Look::One(k) => kind == *k,
                Look::Any(ks) => ks.contains(&kind),
                Look::Pred(p) => p(kind),
            };
            if !matched {
                return false;
            }
        }
        true
    }

    /// Every statement terminator accepts `?>` as an implicit semicolon.
    fn eat_semicolon_or_abort(&mut self) -> Option<Token> {
        if self.check(TokenKind::ScriptSectionEndTag) {
            return None;
        }
        Some(self.eat1(TokenKind::SemicolonToken))
    }

    // ── list machinery ──────────────────────────────────────────────────

    fn parse_list(&mut self, context: ParseContext) -> Vec<Node> {
        let saved_context = self.current_context;
        self.current_context |= 1 << context as u32;
        let mut nodes = Vec::new();
        while !self.is_list_terminator(context) {
            if self.is_valid_list_element(context, self.token().kind) {
                nodes.push(self.parse_list_element(context));
                continue;
            }
            // a token an enclosing list can use ends this one
            if self.is_current_token_valid_in_enclosing_contexts() {
                break;
            }
            let token = self.token();
            nodes.push(Node::skipped(token));
            self.advance();
        }
        self.current_context = saved_context;
        nodes
    }

    fn parse_list_element(&mut self, context: ParseContext) -> Node {
        match context {
            ParseContext::ClassMembers => self.parse_class_element(),
            ParseContext::TraitMembers => self.parse_trait_element(),
            ParseContext::InterfaceMembers => self.parse_interface_element(),
            ParseContext::SwitchStatementElements => self.parse_case_or_default_statement(),
            _ => self.parse_statement(),
        }
    }

    fn is_list_terminator(&self, context: ParseContext) -> bool {
        let kind = self.token().kind;
        if kind == TokenKind::EndOfFileToken {
            // the end of the file ends every list
            return true;
        }
        match context {
            ParseContext::SourceElements => false,
            ParseContext::InterfaceMembers
            | ParseContext::ClassMembers
            | ParseContext::BlockStatements
            | ParseContext::TraitMembers => kind == TokenKind::CloseBraceToken,
            ParseContext::SwitchStatementElements => {
                kind == TokenKind::CloseBraceToken || kind == TokenKind::EndSwitchKeyword
            }
            ParseContext::IfClause2Elements => matches!(
                kind,
                TokenKind::ElseIfKeyword | TokenKind::ElseKeyword | TokenKind::EndIfKeyword
            ),
            ParseContext::WhileStatementElements => kind == TokenKind::EndWhileKeyword,
            ParseContext::CaseStatementElements => {
                kind == TokenKind::CaseKeyword || kind == TokenKind::DefaultKeyword
            }
            ParseContext::ForStatementElements => kind == TokenKind::EndForKeyword,
            ParseContext::ForeachStatementElements => kind == TokenKind::EndForEachKeyword,
            ParseContext::DeclareStatementElements => kind == TokenKind::EndDeclareKeyword,
        }
    }

    fn is_valid_list_element(&self, context: ParseContext, kind: TokenKind) -> bool {
        match context {
            ParseContext::ClassMembers => is_class_member_declaration_start(kind),
            ParseContext::TraitMembers => is_trait_member_declaration_start(kind),
            ParseContext::InterfaceMembers => is_interface_member_declaration_start(kind),
            ParseContext::SwitchStatementElements => {
                kind == TokenKind::CaseKeyword || kind == TokenKind::DefaultKeyword
            }
            _ => self.is_statement_start(kind),
        }
    }

    fn is_current_token_valid_in_enclosing_contexts(&self) -> bool {
        for context in PARSE_CONTEXTS {
            if self.current_context & (1 << context as u32) == 0 {
                continue;
            }
            if self.is_valid_list_element(context, self.token().kind)
                || self.is_list_terminator(context)
            {
                return true;
            }
        }
        false
    }

    // ── start predicates ────────────────────────────────────────────────

    fn is_statement_start(&self, kind: TokenKind) -> bool {
        use TokenKind::*;
        match kind {
            OpenBraceToken
            | Name
            | SemicolonToken
            | IfKeyword
            | SwitchKeyword
            | WhileKeyword
            | DoKeyword
            | ForKeyword
            | ForeachKeyword
            | GotoKeyword
            | ContinueKeyword
            | BreakKeyword
            | ReturnKeyword
            | ThrowKeyword
            | TryKeyword
            | DeclareKeyword
            | ConstKeyword
            | FunctionKeyword
            | ClassKeyword
            | AbstractKeyword
            | FinalKeyword
            | InterfaceKeyword
            | TraitKeyword
            | NamespaceKeyword
            | UseKeyword
            | GlobalKeyword
            | StaticKeyword
            | ScriptSectionEndTag => true,
            _ => self.is_expression_start(kind),
        }
    }

    fn is_expression_start(&self, kind: TokenKind) -> bool {
        use TokenKind::*;
        match kind {
            RequireKeyword | RequireOnceKeyword | IncludeKeyword | IncludeOnceKeyword
            | YieldKeyword | YieldFromKeyword | NewKeyword | CloneKeyword => true,

            PlusToken | MinusToken | ExclamationToken | TildeToken | AtSymbolToken
            | PlusPlusToken | MinusMinusToken => true,

            VariableName | DollarToken => true,

            Name | BackslashToken => true,
            NamespaceKeyword => self.lookahead(&[Look::One(BackslashToken)]),

            OctalLiteralToken | HexadecimalLiteralToken | BinaryLiteralToken
            | FloatingLiteralToken | InvalidOctalLiteralToken | InvalidHexadecimalLiteral
            | InvalidBinaryLiteral | IntegerLiteralToken | StringLiteralToken
            | SingleQuoteToken | DoubleQuoteToken | HeredocStart | BacktickToken => true,

            ArrayKeyword | OpenBracketToken => true,

            EchoKeyword | ListKeyword | UnsetKeyword => true,

            EmptyKeyword | EvalKeyword | ExitKeyword | DieKeyword | IsSetKeyword
            | PrintKeyword => true,

            OpenParenToken | ArrayCastToken | BoolCastToken | DoubleCastToken | IntCastToken
            | ObjectCastToken | StringCastToken | UnsetCastToken => true,

            StaticKeyword | FunctionKeyword => true,

            _ => tables::is_reserved_word(kind),
        }
    }

    // ── statements ──────────────────────────────────────────────────────

    fn parse_statement(&mut self) -> Node {
        use TokenKind::*;
        let token = self.token();
        match token.kind {
            OpenBraceToken => return self.parse_compound_statement(),
            Name if self.lookahead(&[Look::One(ColonToken)]) => {
                return self.parse_named_label_statement()
            }
            IfKeyword => return self.parse_if_statement(),
            SwitchKeyword => return self.parse_switch_statement(),
            WhileKeyword => return self.parse_while_statement(),
            DoKeyword => return self.parse_do_statement(),
            ForKeyword => return self.parse_for_statement(),
            ForeachKeyword => return self.parse_foreach_statement(),
            GotoKeyword => return self.parse_goto_statement(),
            ContinueKeyword | BreakKeyword => return self.parse_break_or_continue_statement(),
            ReturnKeyword => return self.parse_return_statement(),
            ThrowKeyword => return self.parse_throw_statement(),
            TryKeyword => return self.parse_try_statement(),
            DeclareKeyword => return self.parse_declare_statement(),
            FunctionKeyword
                if self.lookahead(&[Look::Pred(tables::is_name_or_keyword_or_reserved)])
                    || self.lookahead(&[
                        Look::One(AmpersandToken),
                        Look::Pred(tables::is_name_or_keyword_or_reserved),
                    ]) =>
            {
                return self.parse_function_declaration()
            }
            FinalKeyword | AbstractKeyword => {
                if !self.lookahead(&[Look::One(ClassKeyword)]) {
                    self.advance();
                    return Node::skipped(token);
                }
                return self.parse_class_declaration();
            }
            ClassKeyword => return self.parse_class_declaration(),
            InterfaceKeyword => return self.parse_interface_declaration(),
            NamespaceKeyword if !self.lookahead(&[Look::One(BackslashToken)]) => {
                return self.parse_namespace_definition()
            }
            UseKeyword => return self.parse_namespace_use_declaration(),
            SemicolonToken => return self.parse_empty_statement(),
            TraitKeyword => return self.parse_trait_declaration(),
            GlobalKeyword => return self.parse_global_declaration(),
            ConstKeyword => return self.parse_const_declaration(),
            StaticKeyword
                if !self.lookahead(&[Look::Any(&[
                    FunctionKeyword,
                    OpenParenToken,
                    ColonColonToken,
                ])]) =>
            {
                return self.parse_function_static_declaration()
            }
            ScriptSectionEndTag => return self.parse_inline_html(),
            _ => {}
        }

        // anything else is an expression statement
        let expression = self.parse_expression();
        let mut parts = vec![expression];
        if parts[0].is_missing() {
            // the offending token is swallowed, but kept, as skipped
            let current = self.token();
            if current.kind != TokenKind::EndOfFileToken {
                parts.push(Node::skipped(current));
            }
            self.advance();
        }
        let semicolon = self.eat_semicolon_or_abort();
        Node::ExpressionStatement(Box::new(ExpressionStatement {
            expression: parts,
            semicolon,
        }))
    }

    fn parse_inline_html(&mut self) -> Node {
        let script_section_end_tag = self.eat_optional(TokenKind::ScriptSectionEndTag);
        let text = self.eat_optional(TokenKind::InlineHtml);
        let script_section_start_tag = self.eat_optional(TokenKind::ScriptSectionStartTag);
        Node::InlineHtml(Box::new(InlineHtml {
            script_section_end_tag,
            text,
            script_section_start_tag,
        }))
    }

    fn parse_compound_statement(&mut self) -> Node {
        let open_brace = self.eat1(TokenKind::OpenBraceToken);
        let statements = self.parse_list(ParseContext::BlockStatements);
        let close_brace = self.eat1(TokenKind::CloseBraceToken);
        Node::CompoundStatement(Box::new(CompoundStatement {
            open_brace,
            statements,
            close_brace,
        }))
    }

    fn parse_named_label_statement(&mut self) -> Node {
        let name = self.eat1(TokenKind::Name);
        let colon = self.eat1(TokenKind::ColonToken);
        let statement = self.parse_statement();
        Node::NamedLabelStatement(Box::new(NamedLabelStatement {
            name,
            colon,
            statement,
        }))
    }

    fn parse_empty_statement(&mut self) -> Node {
        let semicolon = self.eat1(TokenKind::SemicolonToken);
        Node::EmptyStatement(Box::new(EmptyStatement { semicolon }))
    }

    fn parse_if_statement(&mut self) -> Node {
        let if_keyword = self.eat1(TokenKind::IfKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let mut colon = None;
        let statements;
        if self.check(TokenKind::ColonToken) {
            colon = Some(self.eat1(TokenKind::ColonToken));
            statements = self.parse_list(ParseContext::IfClause2Elements);
        } else {
            statements = vec![self.parse_statement()];
        }
        let mut else_if_clauses = Vec::new();
        while self.check(TokenKind::ElseIfKeyword) {
            else_if_clauses.push(self.parse_else_if_clause());
        }
        let else_clause = if self.check(TokenKind::ElseKeyword) {
            Some(self.parse_else_clause())
        } else {
            None
        };
        let endif_keyword = self.eat_optional(TokenKind::EndIfKeyword);
        let semicolon = if endif_keyword.is_some() {
            self.eat_semicolon_or_abort()
        } else {
            None
        };
        Node::IfStatement(Box::new(IfStatement {
            if_keyword,
            open_paren,
            expression,
            close_paren,
            colon,
            statements,
            else_if_clauses,
            else_clause,
            endif_keyword,
            semicolon,
        }))
    }

    fn parse_else_if_clause(&mut self) -> Node {
        let else_if_keyword = self.eat1(TokenKind::ElseIfKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let mut colon = None;
        let statements;
        if self.check(TokenKind::ColonToken) {
            colon = Some(self.eat1(TokenKind::ColonToken));
            statements = self.parse_list(ParseContext::IfClause2Elements);
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::ElseIfClause(Box::new(ElseIfClause {
            else_if_keyword,
            open_paren,
            expression,
            close_paren,
            colon,
            statements,
        }))
    }

    fn parse_else_clause(&mut self) -> Node {
        let else_keyword = self.eat1(TokenKind::ElseKeyword);
        let mut colon = None;
        let statements;
        if self.check(TokenKind::ColonToken) {
            colon = Some(self.eat1(TokenKind::ColonToken));
            statements = self.parse_list(ParseContext::IfClause2Elements);
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::ElseClause(Box::new(ElseClause {
            else_keyword,
            colon,
            statements,
        }))
    }

    fn parse_switch_statement(&mut self) -> Node {
        let switch_keyword = self.eat1(TokenKind::SwitchKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let open_brace = self.eat_optional(TokenKind::OpenBraceToken);
        let colon = self.eat_optional(TokenKind::ColonToken);
        let case_statements = self.parse_list(ParseContext::SwitchStatementElements);
        let mut close_brace = None;
        let mut endswitch = None;
        let mut semicolon = None;
        if colon.is_some() {
            endswitch = Some(self.eat1(TokenKind::EndSwitchKeyword));
            semicolon = self.eat_semicolon_or_abort();
        } else {
            close_brace = Some(self.eat1(TokenKind::CloseBraceToken));
        }
        Node::SwitchStatement(Box::new(SwitchStatement {
            switch_keyword,
            open_paren,
            expression,
            close_paren,
            open_brace,
            colon,
            case_statements,
            close_brace,
            endswitch,
            semicolon,
        }))
    }

    fn parse_case_or_default_statement(&mut self) -> Node {
        let case_keyword = self.eat_any(&[TokenKind::CaseKeyword, TokenKind::DefaultKeyword]);
        let expression = if case_keyword.kind == TokenKind::CaseKeyword {
            Some(self.parse_expression())
        } else {
            None
        };
        let default_label_terminator =
            self.eat_any(&[TokenKind::ColonToken, TokenKind::SemicolonToken]);
        let statement_list = self.parse_list(ParseContext::CaseStatementElements);
        Node::CaseStatement(Box::new(CaseStatement {
            case_keyword,
            expression,
            default_label_terminator,
            statement_list,
        }))
    }

    fn parse_while_statement(&mut self) -> Node {
        let while_token = self.eat1(TokenKind::WhileKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let colon = self.eat_optional(TokenKind::ColonToken);
        let statements;
        let mut end_while = None;
        let mut semicolon = None;
        if colon.is_some() {
            statements = self.parse_list(ParseContext::WhileStatementElements);
            end_while = Some(self.eat1(TokenKind::EndWhileKeyword));
            semicolon = self.eat_semicolon_or_abort();
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::WhileStatement(Box::new(WhileStatement {
            while_token,
            open_paren,
            expression,
            close_paren,
            colon,
            statements,
            end_while,
            semicolon,
        }))
    }

    fn parse_do_statement(&mut self) -> Node {
        let do_keyword = self.eat1(TokenKind::DoKeyword);
        let statement = self.parse_statement();
        let while_token = self.eat1(TokenKind::WhileKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let semicolon = self.eat_semicolon_or_abort();
        Node::DoStatement(Box::new(DoStatement {
            do_keyword,
            statement,
            while_token,
            open_paren,
            expression,
            close_paren,
            semicolon,
        }))
    }

    fn parse_for_statement(&mut self) -> Node {
        let for_keyword = self.eat1(TokenKind::ForKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let for_initializer = self.parse_expression_list();
        let expr_group_semicolon1 = self.eat1(TokenKind::SemicolonToken);
        let for_control = self.parse_expression_list();
        let expr_group_semicolon2 = self.eat1(TokenKind::SemicolonToken);
        let for_end_of_loop = self.parse_expression_list();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let colon = self.eat_optional(TokenKind::ColonToken);
        let statements;
        let mut end_for = None;
        let mut end_for_semicolon = None;
        if colon.is_some() {
            statements = self.parse_list(ParseContext::ForStatementElements);
            end_for = Some(self.eat1(TokenKind::EndForKeyword));
            end_for_semicolon = self.eat_semicolon_or_abort();
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::ForStatement(Box::new(ForStatement {
            for_keyword,
            open_paren,
            for_initializer,
            expr_group_semicolon1,
            for_control,
            expr_group_semicolon2,
            for_end_of_loop,
            close_paren,
            colon,
            statements,
            end_for,
            end_for_semicolon,
        }))
    }

    fn parse_foreach_statement(&mut self) -> Node {
        let foreach = self.eat1(TokenKind::ForeachKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let for_each_collection_name = self.parse_expression();
        let as_keyword = self.eat1(TokenKind::AsKeyword);
        let foreach_key = self.try_parse_foreach_key();
        let foreach_value = self.parse_foreach_value();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let colon = self.eat_optional(TokenKind::ColonToken);
        let statements;
        let mut end_foreach = None;
        let mut end_foreach_semicolon = None;
        if colon.is_some() {
            statements = self.parse_list(ParseContext::ForeachStatementElements);
            end_foreach = Some(self.eat1(TokenKind::EndForEachKeyword));
            end_foreach_semicolon = self.eat_semicolon_or_abort();
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::ForeachStatement(Box::new(ForeachStatement {
            foreach,
            open_paren,
            for_each_collection_name,
            as_keyword,
            foreach_key,
            foreach_value,
            close_paren,
            colon,
            statements,
            end_foreach,
            end_foreach_semicolon,
        }))
    }

    /// `$k =>` before the foreach value; rewinds when no `=>` follows the
    /// candidate expression.
    fn try_parse_foreach_key(&mut self) -> Option<Node> {
        if !self.is_expression_start(self.token().kind) {
            return None;
        }
        let start_pos = self.pos;
        let expression = self.parse_expression();
        if !self.check(TokenKind::DoubleArrowToken) {
            self.pos = start_pos;
            return None;
        }
        let arrow = self.eat1(TokenKind::DoubleArrowToken);
        Some(Node::ForeachKey(Box::new(ForeachKey { expression, arrow })))
    }

    fn parse_foreach_value(&mut self) -> Node {
        let ampersand = self.eat_optional(TokenKind::AmpersandToken);
        let expression = self.parse_expression();
        Node::ForeachValue(Box::new(ForeachValue {
            ampersand,
            expression,
        }))
    }

    fn parse_goto_statement(&mut self) -> Node {
        let goto_keyword = self.eat1(TokenKind::GotoKeyword);
        let name = self.eat1(TokenKind::Name);
        let semicolon = self.eat_semicolon_or_abort();
        Node::GotoStatement(Box::new(GotoStatement {
            goto_keyword,
            name,
            semicolon,
        }))
    }

    fn parse_break_or_continue_statement(&mut self) -> Node {
        let break_or_continue_keyword =
            self.eat_any(&[TokenKind::ContinueKeyword, TokenKind::BreakKeyword]);
        let breakout_level = if self.is_expression_start(self.token().kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        let semicolon = self.eat_semicolon_or_abort();
        Node::BreakOrContinueStatement(Box::new(BreakOrContinueStatement {
            break_or_continue_keyword,
            breakout_level,
            semicolon,
        }))
    }

    fn parse_return_statement(&mut self) -> Node {
        let return_keyword = self.eat1(TokenKind::ReturnKeyword);
        let expression = if self.is_expression_start(self.token().kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        let semicolon = self.eat_semicolon_or_abort();
        Node::ReturnStatement(Box::new(ReturnStatement {
            return_keyword,
            expression,
            semicolon,
        }))
    }

    fn parse_throw_statement(&mut self) -> Node {
        let throw_keyword = self.eat1(TokenKind::ThrowKeyword);
        let expression = self.parse_expression();
        let semicolon = self.eat_semicolon_or_abort();
        Node::ThrowStatement(Box::new(ThrowStatement {
            throw_keyword,
            expression,
            semicolon,
        }))
    }

    fn parse_try_statement(&mut self) -> Node {
        let try_keyword = self.eat1(TokenKind::TryKeyword);
        let compound_statement = self.parse_compound_statement();
        let mut catch_clauses = Vec::new();
        while self.check(TokenKind::CatchKeyword) {
            catch_clauses.push(self.parse_catch_clause());
        }
        let finally_clause = if self.check(TokenKind::FinallyKeyword) {
            Some(self.parse_finally_clause())
        } else {
            None
        };
        Node::TryStatement(Box::new(TryStatement {
            try_keyword,
            compound_statement,
            catch_clauses,
            finally_clause,
        }))
    }

    fn parse_catch_clause(&mut self) -> Node {
        let catch = self.eat1(TokenKind::CatchKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let qualified_name = self.parse_qualified_name();
        let variable_name = self.eat1(TokenKind::VariableName);
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let compound_statement = self.parse_compound_statement();
        Node::CatchClause(Box::new(CatchClause {
            catch,
            open_paren,
            qualified_name,
            variable_name,
            close_paren,
            compound_statement,
        }))
    }

    fn parse_finally_clause(&mut self) -> Node {
        let finally_token = self.eat1(TokenKind::FinallyKeyword);
        let compound_statement = self.parse_compound_statement();
        Node::FinallyClause(Box::new(FinallyClause {
            finally_token,
            compound_statement,
        }))
    }

    fn parse_declare_statement(&mut self) -> Node {
        let declare_keyword = self.eat1(TokenKind::DeclareKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let declare_directive = self.parse_declare_directive();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        let mut colon = None;
        let mut statements = Vec::new();
        let mut enddeclare_keyword = None;
        let mut semicolon = None;
        if self.check(TokenKind::SemicolonToken) {
            semicolon = self.eat_semicolon_or_abort();
        } else if self.check(TokenKind::ColonToken) {
            colon = Some(self.eat1(TokenKind::ColonToken));
            statements = self.parse_list(ParseContext::DeclareStatementElements);
            enddeclare_keyword = Some(self.eat1(TokenKind::EndDeclareKeyword));
            semicolon = self.eat_semicolon_or_abort();
        } else {
            statements = vec![self.parse_statement()];
        }
        Node::DeclareStatement(Box::new(DeclareStatement {
            declare_keyword,
            open_paren,
            declare_directive,
            close_paren,
            colon,
            statements,
            enddeclare_keyword,
            semicolon,
        }))
    }

    fn parse_declare_directive(&mut self) -> Node {
        let name = self.eat1(TokenKind::Name);
        let equals = self.eat1(TokenKind::EqualsToken);
        let literal = self.eat_any(&[
            TokenKind::FloatingLiteralToken,
            TokenKind::IntegerLiteralToken,
            TokenKind::OctalLiteralToken,
            TokenKind::HexadecimalLiteralToken,
            TokenKind::BinaryLiteralToken,
            TokenKind::InvalidOctalLiteralToken,
            TokenKind::InvalidHexadecimalLiteral,
            TokenKind::InvalidBinaryLiteral,
            TokenKind::StringLiteralToken,
        ]);
        Node::DeclareDirective(Box::new(DeclareDirective {
            name,
            equals,
            literal,
        }))
    }

    // ── declarations ────────────────────────────────────────────────────

    fn parse_function_declaration(&mut self) -> Node {
        let (header, _, return_type, body) = self.parse_function_type(false, false);
        Node::FunctionDeclaration(Box::new(FunctionDeclaration {
            header,
            return_type,
            body,
        }))
    }

    /// The shared function-like shape: header, optional use clause
    /// (anonymous only), optional return type, body.
    fn parse_function_type(
        &mut self,
        can_be_abstract: bool,
        is_anonymous: bool,
    ) -> (FunctionHeader, Option<Node>, FunctionReturnType, FunctionBody) {
        let function_keyword = self.eat1(TokenKind::FunctionKeyword);
        let by_ref_token = self.eat_optional(TokenKind::AmpersandToken);

        let name = if is_anonymous {
            // anonymous functions should not have names; keep one as skipped
            self.eat_optional_name_like().map(|mut token| {
                token.kind = TokenKind::Name;
                Node::skipped(token)
            })
        } else {
            let mut token = self.eat_name_like();
            token.kind = TokenKind::Name;
            Some(Node::token(token))
        };

        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let parameters = self
            .parse_delimited_list(
                TokenKind::CommaToken,
                is_parameter_start,
                Parser::parse_parameter,
                false,
            )
            .map(|children| Node::ParameterDeclarationList(DelimitedList { children }));
        let close_paren = self.eat1(TokenKind::CloseParenToken);

        let header = FunctionHeader {
            function_keyword,
            by_ref_token,
            name,
            open_paren,
            parameters,
            close_paren,
        };

        let use_clause = if is_anonymous {
            self.parse_anonymous_function_use_clause()
        } else {
            None
        };

        let mut return_type = FunctionReturnType::default();
        if self.check(TokenKind::ColonToken) {
            return_type.colon_token = Some(self.eat1(TokenKind::ColonToken));
            return_type.question_token = self.eat_optional(TokenKind::QuestionToken);
            return_type.return_type = Some(self.parse_return_type_declaration());
        }

        let body = if can_be_abstract {
            match self.eat_optional(TokenKind::SemicolonToken) {
                Some(semicolon) => FunctionBody {
                    compound_statement_or_semicolon: Node::token(semicolon),
                },
                None => FunctionBody {
                    compound_statement_or_semicolon: self.parse_compound_statement(),
                },
            }
        } else {
            FunctionBody {
                compound_statement_or_semicolon: self.parse_compound_statement(),
            }
        };

        (header, use_clause, return_type, body)
    }

    fn eat_name_like(&mut self) -> Token {
        let token = self.token();
        if tables::is_name_or_keyword_or_reserved(token.kind) {
            self.advance();
            return token;
        }
        Token::missing(TokenKind::Name, token.full_start)
    }

    fn eat_optional_name_like(&mut self) -> Option<Token> {
        let token = self.token();
        if tables::is_name_or_keyword_or_reserved(token.kind) {
            self.advance();
            return Some(token);
        }
        None
    }

    fn parse_parameter(&mut self) -> Node {
        let question_token = self.eat_optional(TokenKind::QuestionToken);
        let type_declaration = self.try_parse_parameter_type_declaration();
        let by_ref_token = self.eat_optional(TokenKind::AmpersandToken);
        let dot_dot_dot_token = self.eat_optional(TokenKind::DotDotDotToken);
        let variable_name = self.eat1(TokenKind::VariableName);
        let equals_token = self.eat_optional(TokenKind::EqualsToken);
        let default = if equals_token.is_some() {
            Some(self.parse_expression())
        } else {
            None
        };
        Node::Parameter(Box::new(Parameter {
            question_token,
            type_declaration,
            by_ref_token,
            dot_dot_dot_token,
            variable_name,
            equals_token,
            default,
        }))
    }

    fn try_parse_parameter_type_declaration(&mut self) -> Option<Node> {
        if let Some(token) = self.eat_optional_any(&PARAMETER_TYPE_KINDS) {
            return Some(Node::token(token));
        }
        self.parse_qualified_name()
    }

    fn parse_return_type_declaration(&mut self) -> Node {
        if let Some(token) = self.eat_optional_any(&RETURN_TYPE_KINDS) {
            return Node::token(token);
        }
        match self.parse_qualified_name() {
            Some(name) => name,
            None => Node::missing(TokenKind::ReturnType, self.token().full_start),
        }
    }

    fn parse_anonymous_function_use_clause(&mut self) -> Option<Node> {
        let use_keyword = self.eat_optional(TokenKind::UseKeyword)?;
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let use_variable_name_list = self
            .parse_delimited_list(
                TokenKind::CommaToken,
                |_, kind| kind == TokenKind::AmpersandToken || kind == TokenKind::VariableName,
                Parser::parse_use_variable_name,
                false,
            )
            .map(|children| Node::UseVariableNameList(DelimitedList { children }));
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Some(Node::AnonymousFunctionUseClause(Box::new(
            AnonymousFunctionUseClause {
                use_keyword,
                open_paren,
                use_variable_name_list,
                close_paren,
            },
        )))
    }

    fn parse_use_variable_name(&mut self) -> Node {
        let by_ref = self.eat_optional(TokenKind::AmpersandToken);
        let variable_name = self.eat1(TokenKind::VariableName);
        Node::UseVariableName(Box::new(UseVariableName {
            by_ref,
            variable_name,
        }))
    }

    fn parse_class_declaration(&mut self) -> Node {
        let abstract_or_final_modifier =
            self.eat_optional_any(&[TokenKind::AbstractKeyword, TokenKind::FinalKeyword]);
        let class_keyword = self.eat1(TokenKind::ClassKeyword);
        let mut name = self.eat_name_or_reserved();
        name.kind = TokenKind::Name;
        let class_base_clause = self.parse_class_base_clause();
        let class_interface_clause = self.parse_class_interface_clause();
        let class_members = self.parse_class_members();
        Node::ClassDeclaration(Box::new(ClassDeclaration {
            abstract_or_final_modifier,
            class_keyword,
            name,
            class_base_clause,
            class_interface_clause,
            class_members,
        }))
    }

    fn eat_name_or_reserved(&mut self) -> Token {
        let token = self.token();
        if token.kind == TokenKind::Name || tables::is_reserved_word(token.kind) {
            self.advance();
            return token;
        }
        Token::missing(TokenKind::Name, token.full_start)
    }

    fn parse_class_base_clause(&mut self) -> Option<Node> {
        let extends_keyword = self.eat_optional(TokenKind::ExtendsKeyword)?;
        let base_class = self.parse_qualified_name();
        Some(Node::ClassBaseClause(Box::new(ClassBaseClause {
            extends_keyword,
            base_class,
        })))
    }

    fn parse_class_interface_clause(&mut self) -> Option<Node> {
        let implements_keyword = self.eat_optional(TokenKind::ImplementsKeyword)?;
        let interface_name_list = self.parse_qualified_name_list();
        Some(Node::ClassInterfaceClause(Box::new(ClassInterfaceClause {
            implements_keyword,
            interface_name_list,
        })))
    }

    fn parse_qualified_name_list(&mut self) -> Option<Node> {
        self.parse_delimited_list(
            TokenKind::CommaToken,
            |_, kind| is_qualified_name_start(kind),
            |p| {
                p.parse_qualified_name()
                    .unwrap_or_else(|| Node::missing(TokenKind::Name, p.token().full_start))
            },
            false,
        )
        .map(|children| Node::QualifiedNameList(DelimitedList { children }))
    }

    fn parse_class_members(&mut self) -> Node {
        let open_brace = self.eat1(TokenKind::OpenBraceToken);
        let class_member_declarations = self.parse_list(ParseContext::ClassMembers);
        let close_brace = self.eat1(TokenKind::CloseBraceToken);
        Node::ClassMembers(Box::new(ClassMembers {
            open_brace,
            class_member_declarations,
            close_brace,
        }))
    }

    fn parse_modifiers(&mut self) -> Vec<Token> {
        let mut modifiers = Vec::new();
        while is_modifier(self.token().kind) {
            modifiers.push(self.token());
            self.advance();
        }
        modifiers
    }

    fn parse_class_element(&mut self) -> Node {
        let modifiers = self.parse_modifiers();
        match self.token().kind {
            TokenKind::ConstKeyword => self.parse_class_const_declaration(modifiers),
            TokenKind::FunctionKeyword => self.parse_method_declaration(modifiers),
            TokenKind::VariableName => self.parse_property_declaration(modifiers),
            TokenKind::UseKeyword => self.parse_trait_use_clause(),
            _ => Node::MissingMemberDeclaration(Box::new(MissingMemberDeclaration { modifiers })),
        }
    }

    fn parse_trait_element(&mut self) -> Node {
        let modifiers = self.parse_modifiers();
        match self.token().kind {
            TokenKind::FunctionKeyword => self.parse_method_declaration(modifiers),
            TokenKind::VariableName => self.parse_property_declaration(modifiers),
            TokenKind::UseKeyword => self.parse_trait_use_clause(),
            _ => Node::MissingMemberDeclaration(Box::new(MissingMemberDeclaration { modifiers })),
        }
    }

    fn parse_interface_element(&mut self) -> Node {
        let modifiers = self.parse_modifiers();
        match self.token().kind {
            TokenKind::ConstKeyword => self.parse_class_const_declaration(modifiers),
            TokenKind::FunctionKeyword => self.parse_method_declaration(modifiers),
            _ => Node::MissingMemberDeclaration(Box::new(MissingMemberDeclaration { modifiers })),
        }
    }

    fn parse_method_declaration(&mut self, modifiers: Vec<Token>) -> Node {
        let (header, _, return_type, body) = self.parse_function_type(true, false);
        Node::MethodDeclaration(Box::new(MethodDeclaration {
            modifiers,
            header,
            return_type,
            body,
        }))
    }

    fn parse_class_const_declaration(&mut self, modifiers: Vec<Token>) -> Node {
        let const_keyword = self.eat1(TokenKind::ConstKeyword);
        let const_elements = self.parse_const_elements();
        let semicolon = self.eat1(TokenKind::SemicolonToken);
        Node::ClassConstDeclaration(Box::new(ClassConstDeclaration {
            modifiers,
            const_keyword,
            const_elements,
            semicolon,
        }))
    }

    fn parse_const_elements(&mut self) -> Option<Node> {
        self.parse_delimited_list(
            TokenKind::CommaToken,
            |_, kind| tables::is_name_or_keyword_or_reserved(kind),
            Parser::parse_const_element,
            false,
        )
        .map(|children| Node::ConstElementList(DelimitedList { children }))
    }

    fn parse_const_element(&mut self) -> Node {
        let mut name = self.token();
        self.advance();
        // keyword names are allowed here
        name.kind = TokenKind::Name;
        let equals_token = self.eat1(TokenKind::EqualsToken);
        let assignment = self.parse_expression();
        Node::ConstElement(Box::new(ConstElement {
            name,
            equals_token,
            assignment,
        }))
    }

    fn parse_property_declaration(&mut self, modifiers: Vec<Token>) -> Node {
        let property_elements = self.parse_expression_list();
        let semicolon = self.eat1(TokenKind::SemicolonToken);
        Node::PropertyDeclaration(Box::new(PropertyDeclaration {
            modifiers,
            property_elements,
            semicolon,
        }))
    }

    fn parse_trait_use_clause(&mut self) -> Node {
        let use_keyword = self.eat1(TokenKind::UseKeyword);
        let trait_name_list = self.parse_qualified_name_list();
        let semicolon_or_open_brace =
            self.eat_any(&[TokenKind::OpenBraceToken, TokenKind::SemicolonToken]);
        let mut trait_select_and_alias_clauses = None;
        let mut close_brace = None;
        if semicolon_or_open_brace.kind == TokenKind::OpenBraceToken {
            trait_select_and_alias_clauses = self
                .parse_delimited_list(
                    TokenKind::SemicolonToken,
                    |_, kind| is_qualified_name_start(kind),
                    Parser::parse_trait_select_or_alias_clause,
                    false,
                )
                .map(|children| Node::TraitSelectOrAliasClauseList(DelimitedList { children }));
            close_brace = Some(self.eat1(TokenKind::CloseBraceToken));
        }
        Node::TraitUseClause(Box::new(TraitUseClause {
            use_keyword,
            trait_name_list,
            semicolon_or_open_brace,
            trait_select_and_alias_clauses,
            close_brace,
        }))
    }

    fn parse_trait_select_or_alias_clause(&mut self) -> Node {
        let name = self.parse_qualified_name_or_scoped_property_access();
        let as_or_instead_of_keyword =
            self.eat_any(&[TokenKind::AsKeyword, TokenKind::InsteadOfKeyword]);
        let modifiers = self.parse_modifiers();
        let target_name = self.parse_qualified_name_or_scoped_property_access();
        Node::TraitSelectOrAliasClause(Box::new(TraitSelectOrAliasClause {
            name,
            as_or_instead_of_keyword,
            modifiers,
            target_name,
        }))
    }

    fn parse_qualified_name_or_scoped_property_access(&mut self) -> Option<Node> {
        let mut name = self.parse_qualified_name()?;
        if self.check(TokenKind::ColonColonToken) {
            name = self.parse_scoped_property_access_expression(name);
        }
        Some(name)
    }

    fn parse_interface_declaration(&mut self) -> Node {
        let interface_keyword = self.eat1(TokenKind::InterfaceKeyword);
        let name = self.eat1(TokenKind::Name);
        let interface_base_clause = self.parse_interface_base_clause();
        let interface_members = self.parse_interface_members();
        Node::InterfaceDeclaration(Box::new(InterfaceDeclaration {
            interface_keyword,
            name,
            interface_base_clause,
            interface_members,
        }))
    }

    fn parse_interface_base_clause(&mut self) -> Option<Node> {
        let extends_keyword = self.eat_optional(TokenKind::ExtendsKeyword)?;
        let interface_name_list = self.parse_qualified_name_list();
        Some(Node::InterfaceBaseClause(Box::new(InterfaceBaseClause {
            extends_keyword,
            interface_name_list,
        })))
    }

    fn parse_interface_members(&mut self) -> Node {
        let open_brace = self.eat1(TokenKind::OpenBraceToken);
        let interface_member_declarations = self.parse_list(ParseContext::InterfaceMembers);
        let close_brace = self.eat1(TokenKind::CloseBraceToken);
        Node::InterfaceMembers(Box::new(InterfaceMembers {
            open_brace,
            interface_member_declarations,
            close_brace,
        }))
    }

    fn parse_trait_declaration(&mut self) -> Node {
        let trait_keyword = self.eat1(TokenKind::TraitKeyword);
        let name = self.eat1(TokenKind::Name);
        let trait_members = self.parse_trait_members();
        Node::TraitDeclaration(Box::new(TraitDeclaration {
            trait_keyword,
            name,
            trait_members,
        }))
    }

    fn parse_trait_members(&mut self) -> Node {
        let open_brace = self.eat1(TokenKind::OpenBraceToken);
        let trait_member_declarations = self.parse_list(ParseContext::TraitMembers);
        let close_brace = self.eat1(TokenKind::CloseBraceToken);
        Node::TraitMembers(Box::new(TraitMembers {
            open_brace,
            trait_member_declarations,
            close_brace,
        }))
    }

    fn parse_namespace_definition(&mut self) -> Node {
        let namespace_keyword = self.eat1(TokenKind::NamespaceKeyword);
        let name = if !self.check(TokenKind::NamespaceKeyword) {
            self.parse_qualified_name()
        } else {
            None
        };
        let compound_statement_or_semicolon = if self.check(TokenKind::OpenBraceToken) {
            Some(self.parse_compound_statement())
        } else {
            self.eat_semicolon_or_abort().map(Node::token)
        };
        Node::NamespaceDefinition(Box::new(NamespaceDefinition {
            namespace_keyword,
            name,
            compound_statement_or_semicolon,
        }))
    }

    fn parse_namespace_use_declaration(&mut self) -> Node {
        let use_keyword = self.eat1(TokenKind::UseKeyword);
        let function_or_const =
            self.eat_optional_any(&[TokenKind::FunctionKeyword, TokenKind::ConstKeyword]);
        let use_clauses = self
            .parse_delimited_list(
                TokenKind::CommaToken,
                is_namespace_use_clause_start,
                Parser::parse_namespace_use_clause,
                false,
            )
            .map(|children| Node::NamespaceUseClauseList(DelimitedList { children }));
        let semicolon = self.eat_semicolon_or_abort();
        Node::NamespaceUseDeclaration(Box::new(NamespaceUseDeclaration {
            use_keyword,
            function_or_const,
            use_clauses,
            semicolon,
        }))
    }

    fn parse_namespace_use_clause(&mut self) -> Node {
        let namespace_name = self.parse_qualified_name();
        let mut namespace_aliasing_clause = None;
        let mut open_brace = None;
        let mut group_clauses = None;
        let mut close_brace = None;
        if self.check(TokenKind::AsKeyword) {
            namespace_aliasing_clause = Some(self.parse_namespace_aliasing_clause());
        } else if self.check(TokenKind::OpenBraceToken) {
            open_brace = Some(self.eat1(TokenKind::OpenBraceToken));
            group_clauses = self
                .parse_delimited_list(
                    TokenKind::CommaToken,
                    is_namespace_use_clause_start,
                    Parser::parse_namespace_use_group_clause,
                    false,
                )
                .map(|children| Node::NamespaceUseGroupClauseList(DelimitedList { children }));
            close_brace = Some(self.eat1(TokenKind::CloseBraceToken));
        }
        Node::NamespaceUseClause(Box::new(NamespaceUseClause {
            namespace_name,
            namespace_aliasing_clause,
            open_brace,
            group_clauses,
            close_brace,
        }))
    }

    fn parse_namespace_use_group_clause(&mut self) -> Node {
        let function_or_const =
            self.eat_optional_any(&[TokenKind::FunctionKeyword, TokenKind::ConstKeyword]);
        let namespace_name = self.parse_qualified_name();
        let namespace_aliasing_clause = if self.check(TokenKind::AsKeyword) {
            Some(self.parse_namespace_aliasing_clause())
        } else {
            None
        };
        Node::NamespaceUseGroupClause(Box::new(NamespaceUseGroupClause {
            function_or_const,
            namespace_name,
            namespace_aliasing_clause,
        }))
    }

    fn parse_namespace_aliasing_clause(&mut self) -> Node {
        let as_keyword = self.eat1(TokenKind::AsKeyword);
        let name = self.eat1(TokenKind::Name);
        Node::NamespaceAliasingClause(Box::new(NamespaceAliasingClause { as_keyword, name }))
    }

    fn parse_global_declaration(&mut self) -> Node {
        let global_keyword = self.eat1(TokenKind::GlobalKeyword);
        let variable_name_list = self
            .parse_delimited_list(
                TokenKind::CommaToken,
                |_, kind| kind == TokenKind::VariableName || kind == TokenKind::DollarToken,
                Parser::parse_simple_variable,
                false,
            )
            .map(|children| Node::VariableNameList(DelimitedList { children }));
        let semicolon = self.eat_semicolon_or_abort();
        Node::GlobalDeclaration(Box::new(GlobalDeclaration {
            global_keyword,
            variable_name_list,
            semicolon,
        }))
    }

    fn parse_const_declaration(&mut self) -> Node {
        let const_keyword = self.eat1(TokenKind::ConstKeyword);
        let const_elements = self.parse_const_elements();
        let semicolon = self.eat_semicolon_or_abort();
        Node::ConstDeclaration(Box::new(ConstDeclaration {
            const_keyword,
            const_elements,
            semicolon,
        }))
    }

    fn parse_function_static_declaration(&mut self) -> Node {
        let static_keyword = self.eat1(TokenKind::StaticKeyword);
        let static_variable_name_list = self
            .parse_delimited_list(
                TokenKind::CommaToken,
                |_, kind| kind == TokenKind::VariableName,
                Parser::parse_static_variable_declaration,
                false,
            )
            .map(|children| Node::StaticVariableNameList(DelimitedList { children }));
        let semicolon = self.eat_semicolon_or_abort();
        Node::FunctionStaticDeclaration(Box::new(FunctionStaticDeclaration {
            static_keyword,
            static_variable_name_list,
            semicolon,
        }))
    }

    fn parse_static_variable_declaration(&mut self) -> Node {
        let variable_name = self.eat1(TokenKind::VariableName);
        let equals_token = self.eat_optional(TokenKind::EqualsToken);
        let assignment = if equals_token.is_some() {
            Some(self.parse_expression())
        } else {
            None
        };
        Node::StaticVariableDeclaration(Box::new(StaticVariableDeclaration {
            variable_name,
            equals_token,
            assignment,
        }))
    }

    // ── delimited lists ─────────────────────────────────────────────────

    fn parse_delimited_list(
        &mut self,
        delimiter: TokenKind,
        is_element_start: fn(&Parser, TokenKind) -> bool,
        parse_element: fn(&mut Parser) -> Node,
        allow_empty_elements: bool,
    ) -> Option<Vec<Node>> {
        let mut children: Vec<Node> = Vec::new();
        loop {
            if is_element_start(self, self.token().kind) {
                children.push(parse_element(self));
            } else if !allow_empty_elements || !self.check(delimiter) {
                break;
            }
            match self.eat_optional(delimiter) {
                Some(token) => children.push(Node::token(token)),
                None => break,
            }
        }
        if children.is_empty() {
            None
        } else {
            Some(children)
        }
    }

    fn parse_expression_list(&mut self) -> Option<Node> {
        self.parse_delimited_list(
            TokenKind::CommaToken,
            |p, kind| p.is_expression_start(kind),
            Parser::parse_expression,
            false,
        )
        .map(|children| Node::ExpressionList(DelimitedList { children }))
    }

    // ── expressions ─────────────────────────────────────────────────────

    fn parse_expression(&mut self) -> Node {
        let token = self.token();
        if token.kind == TokenKind::EndOfFileToken {
            return Node::missing(TokenKind::Expression, token.full_start);
        }
        self.parse_binary_expression_or_higher(0)
    }

    fn parse_binary_expression_or_higher(&mut self, precedence: i32) -> Node {
        let mut left_operand = self.parse_unary_expression_or_higher();
        let mut prev_precedence = -1;
        let mut prev_associativity = Associativity::Unknown;
        loop {
            let token = self.token();
            let (new_precedence, associativity) =
                operator_precedence_and_associativity(token.kind);

            // a repeated non-associative operator stops the climb
            if prev_associativity == Associativity::None && prev_precedence == new_precedence {
                break;
            }

            let should_consume = if associativity == Associativity::Right {
                new_precedence >= precedence
            } else {
                new_precedence > precedence
            };
            if !should_consume {
                break;
            }

            // ** binds tighter than a prefix unary: temporarily unwrap the
            // unary so it ends up around the power expression
            let rebind_unary = token.kind == TokenKind::AsteriskAsteriskToken
                && matches!(left_operand, Node::UnaryOpExpression(_));
            let unary_operator = if rebind_unary {
                let Node::UnaryOpExpression(unary) = left_operand else {
                    unreachable!()
                };
                left_operand = unary.operand;
                Some(unary.operator)
            } else {
                None
            };

            self.advance();

            let by_ref = if token.kind == TokenKind::EqualsToken {
                self.eat_optional(TokenKind::AmpersandToken)
            } else {
                None
            };

            left_operand = if token.kind == TokenKind::QuestionToken {
                self.parse_ternary_expression(left_operand, token)
            } else if token.kind == TokenKind::EqualsToken {
                let right_operand = self.parse_binary_expression_or_higher(new_precedence);
                Node::AssignmentExpression(Box::new(AssignmentExpression {
                    left_operand,
                    operator: token,
                    by_ref,
                    right_operand,
                }))
            } else {
                let right_operand = self.parse_binary_expression_or_higher(new_precedence);
                Node::BinaryExpression(Box::new(BinaryExpression {
                    left_operand,
                    operator: token,
                    right_operand,
                }))
            };

            if let Some(operator) = unary_operator {
                left_operand = Node::UnaryOpExpression(Box::new(UnaryOpExpression {
                    operator,
                    operand: left_operand,
                }));
            }

            prev_precedence = new_precedence;
            prev_associativity = associativity;
        }
        left_operand
    }

    fn parse_ternary_expression(&mut self, condition: Node, question_token: Token) -> Node {
        let if_expression = if self.is_expression_start(self.token().kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        let colon_token = self.eat1(TokenKind::ColonToken);
        let else_expression = self.parse_binary_expression_or_higher(TERNARY_ELSE_PRECEDENCE);
        Node::TernaryExpression(Box::new(TernaryExpression {
            condition,
            question_token,
            if_expression,
            colon_token,
            else_expression,
        }))
    }

    fn parse_unary_expression_or_higher(&mut self) -> Node {
        use TokenKind::*;
        let token = self.token();
        match token.kind {
            PlusToken | MinusToken | ExclamationToken | TildeToken => {
                let operator =
                    self.eat_any(&[PlusToken, MinusToken, ExclamationToken, TildeToken]);
                let operand = self.parse_unary_expression_or_higher();
                Node::UnaryOpExpression(Box::new(UnaryOpExpression { operator, operand }))
            }
            AtSymbolToken => {
                let operator = self.eat1(AtSymbolToken);
                let operand = self.parse_unary_expression_or_higher();
                Node::ErrorControlExpression(Box::new(ErrorControlExpression {
                    operator,
                    operand,
                }))
            }
            PlusPlusToken | MinusMinusToken => self.parse_prefix_update_expression(),
            ArrayCastToken | BoolCastToken | DoubleCastToken | IntCastToken | ObjectCastToken
            | StringCastToken | UnsetCastToken => self.parse_cast_expression(),
            OpenParenToken
                if self.lookahead(&[
                    Look::Any(&GRANULAR_CAST_KINDS),
                    Look::One(CloseParenToken),
                ]) =>
            {
                self.parse_cast_expression_granular()
            }
            NewKeyword => self.parse_object_creation_expression(),
            CloneKeyword => self.parse_clone_expression(),
            YieldKeyword | YieldFromKeyword => self.parse_yield_expression(),
            IncludeKeyword | IncludeOnceKeyword | RequireKeyword | RequireOnceKeyword => {
                self.parse_script_inclusion_expression()
            }
            _ => {
                let expression = self.parse_primary_expression();
                self.parse_postfix_expression_rest(expression, true)
            }
        }
    }

    fn parse_prefix_update_expression(&mut self) -> Node {
        let increment_or_decrement_operator =
            self.eat_any(&[TokenKind::PlusPlusToken, TokenKind::MinusMinusToken]);
        let mut operand = self.parse_primary_expression();
        if operand.is_missing() {
            operand = self.parse_postfix_expression_rest(operand, false);
        }
        Node::PrefixUpdateExpression(Box::new(PrefixUpdateExpression {
            increment_or_decrement_operator,
            operand,
        }))
    }

    fn parse_cast_expression(&mut self) -> Node {
        let cast_type = self.eat_any(&CAST_TOKEN_KINDS);
        let operand = self.parse_unary_expression_or_higher();
        Node::CastExpression(Box::new(CastExpression {
            open_paren: None,
            cast_type,
            close_paren: None,
            operand,
        }))
    }

    fn parse_cast_expression_granular(&mut self) -> Node {
        let open_paren = Some(self.eat1(TokenKind::OpenParenToken));
        let cast_type = self.eat_any(&GRANULAR_CAST_KINDS);
        let close_paren = Some(self.eat1(TokenKind::CloseParenToken));
        let operand = self.parse_unary_expression_or_higher();
        Node::CastExpression(Box::new(CastExpression {
            open_paren,
            cast_type,
            close_paren,
            operand,
        }))
    }

    fn parse_object_creation_expression(&mut self) -> Node {
        let new_keyword = self.eat1(TokenKind::NewKeyword);

        // while the designator is parsed, a following ( opens the argument
        // list and must not be treated as a call
        self.parsing_object_creation = true;
        let class_type_designator = match self.eat_optional(TokenKind::ClassKeyword) {
            Some(class_keyword) => Node::token(class_keyword),
            None => self.parse_expression(),
        };
        self.parsing_object_creation = false;

        let open_paren = self.eat_optional(TokenKind::OpenParenToken);
        let mut argument_expression_list = None;
        let mut close_paren = None;
        if open_paren.is_some() {
            argument_expression_list = self.parse_argument_expression_list();
            close_paren = Some(self.eat1(TokenKind::CloseParenToken));
        }
        let class_base_clause = self.parse_class_base_clause();
        let class_interface_clause = self.parse_class_interface_clause();
        let class_members = if self.check(TokenKind::OpenBraceToken) {
            Some(self.parse_class_members())
        } else {
            None
        };
        Node::ObjectCreationExpression(Box::new(ObjectCreationExpression {
            new_keyword,
            class_type_designator,
            open_paren,
            argument_expression_list,
            close_paren,
            class_base_clause,
            class_interface_clause,
            class_members,
        }))
    }

    fn parse_argument_expression_list(&mut self) -> Option<Node> {
        self.parse_delimited_list(
            TokenKind::CommaToken,
            |p, kind| kind == TokenKind::DotDotDotToken || p.is_expression_start(kind),
            Parser::parse_argument_expression,
            false,
        )
        .map(|children| Node::ArgumentExpressionList(DelimitedList { children }))
    }

    fn parse_argument_expression(&mut self) -> Node {
        let by_ref_token = self.eat_optional(TokenKind::AmpersandToken);
        let dot_dot_dot_token = self.eat_optional(TokenKind::DotDotDotToken);
        let expression = self.parse_expression();
        Node::ArgumentExpression(Box::new(ArgumentExpression {
            by_ref_token,
            dot_dot_dot_token,
            expression,
        }))
    }

    fn parse_clone_expression(&mut self) -> Node {
        let clone_keyword = self.eat1(TokenKind::CloneKeyword);
        let expression = self.parse_unary_expression_or_higher();
        Node::CloneExpression(Box::new(CloneExpression {
            clone_keyword,
            expression,
        }))
    }

    fn parse_yield_expression(&mut self) -> Node {
        let yield_or_yield_from_keyword =
            self.eat_any(&[TokenKind::YieldFromKeyword, TokenKind::YieldKeyword]);
        let array_element = self.parse_array_element();
        Node::YieldExpression(Box::new(YieldExpression {
            yield_or_yield_from_keyword,
            array_element,
        }))
    }

    fn parse_script_inclusion_expression(&mut self) -> Node {
        let require_or_include_keyword = self.eat_any(&[
            TokenKind::RequireKeyword,
            TokenKind::RequireOnceKeyword,
            TokenKind::IncludeKeyword,
            TokenKind::IncludeOnceKeyword,
        ]);
        let expression = self.parse_expression();
        Node::ScriptInclusionExpression(Box::new(ScriptInclusionExpression {
            require_or_include_keyword,
            expression,
        }))
    }

    fn parse_primary_expression(&mut self) -> Node {
        use TokenKind::*;
        let token = self.token();
        match token.kind {
            VariableName | DollarToken => self.parse_simple_variable(),
            Name | BackslashToken | NamespaceKeyword => self
                .parse_qualified_name()
                .unwrap_or_else(|| Node::missing(Expression, token.full_start)),
            OctalLiteralToken | HexadecimalLiteralToken | BinaryLiteralToken
            | FloatingLiteralToken | InvalidOctalLiteralToken | InvalidHexadecimalLiteral
            | InvalidBinaryLiteral | IntegerLiteralToken => {
                self.parse_numeric_literal_expression()
            }
            StringLiteralToken => {
                let token = self.token();
                self.advance();
                Node::StringLiteral(Box::new(StringLiteral {
                    start_quote: None,
                    children: vec![Node::token(token)],
                    end_quote: None,
                }))
            }
            DoubleQuoteToken | SingleQuoteToken | HeredocStart | BacktickToken => {
                self.parse_template_string_literal_expression()
            }
            ArrayKeyword | OpenBracketToken => self.parse_array_creation_expression(),
            EchoKeyword => self.parse_echo_expression(),
            ListKeyword => self.parse_list_intrinsic_expression(),
            UnsetKeyword => self.parse_unset_intrinsic_expression(),
            EmptyKeyword => self.parse_empty_intrinsic_expression(),
            EvalKeyword => self.parse_eval_intrinsic_expression(),
            ExitKeyword | DieKeyword => self.parse_exit_intrinsic_expression(),
            IsSetKeyword => self.parse_isset_intrinsic_expression(),
            PrintKeyword => self.parse_print_intrinsic_expression(),
            OpenParenToken => self.parse_parenthesized_expression(),
            StaticKeyword => {
                // static:: and static( name the class; static function is a
                // closure
                if self.lookahead(&[Look::Any(&[ColonColonToken, OpenParenToken])])
                    || !self.lookahead(&[Look::One(FunctionKeyword)])
                {
                    return self
                        .parse_qualified_name()
                        .unwrap_or_else(|| Node::missing(Expression, token.full_start));
                }
                self.parse_anonymous_function_creation_expression()
            }
            FunctionKeyword => self.parse_anonymous_function_creation_expression(),
            TrueReservedWord | FalseReservedWord | NullReservedWord => {
                // true::X, true(), true\X name things; bare true is a value
                if self.lookahead(&[Look::Any(&[
                    BackslashToken,
                    ColonColonToken,
                    OpenParenToken,
                ])]) {
                    return self
                        .parse_qualified_name()
                        .unwrap_or_else(|| Node::missing(Expression, token.full_start));
                }
                self.parse_reserved_word_expression()
            }
            _ => {
                if tables::is_reserved_word(token.kind) {
                    return self
                        .parse_qualified_name()
                        .unwrap_or_else(|| Node::missing(Expression, token.full_start));
                }
                Node::missing(Expression, token.full_start)
            }
        }
    }

    fn parse_simple_variable(&mut self) -> Node {
        let token = self.token();
        match token.kind {
            TokenKind::DollarToken => {
                let dollar = Some(self.eat1(TokenKind::DollarToken));
                let name = if self.check(TokenKind::OpenBraceToken) {
                    self.parse_braced_expression()
                } else {
                    self.parse_simple_variable()
                };
                Node::Variable(Box::new(Variable { dollar, name }))
            }
            TokenKind::VariableName | TokenKind::StringVarname => {
                let name = self.eat_any(&[TokenKind::VariableName, TokenKind::StringVarname]);
                Node::Variable(Box::new(Variable {
                    dollar: None,
                    name: Node::token(name),
                }))
            }
            _ => Node::Variable(Box::new(Variable {
                dollar: None,
                name: Node::missing(TokenKind::VariableName, token.full_start),
            })),
        }
    }

    fn parse_braced_expression(&mut self) -> Node {
        let open_brace = self.eat1(TokenKind::OpenBraceToken);
        let expression = self.parse_expression();
        let close_brace = self.eat1(TokenKind::CloseBraceToken);
        Node::BracedExpression(Box::new(BracedExpression {
            open_brace,
            expression,
            close_brace,
        }))
    }

    fn parse_qualified_name(&mut self) -> Option<Node> {
        let relative_specifier = self.parse_relative_specifier();
        let global_specifier = if relative_specifier.is_none() {
            self.eat_optional(TokenKind::BackslashToken)
        } else {
            None
        };
        let name_parts = self
            .parse_delimited_list(
                TokenKind::BackslashToken,
                is_qualified_name_part_start,
                Parser::parse_qualified_name_part,
                false,
            )
            .unwrap_or_default();
        if name_parts.is_empty() && global_specifier.is_none() && relative_specifier.is_none() {
            return None;
        }
        Some(Node::QualifiedName(Box::new(QualifiedName {
            relative_specifier,
            global_specifier,
            name_parts,
        })))
    }

    fn parse_qualified_name_part(&mut self) -> Node {
        // `a\static\b` is invalid but `a\static` and `a\true\b` are fine:
        // a part followed by \ must be a plain name or reserved word
        let mut name = if self.lookahead(&[Look::One(TokenKind::BackslashToken)]) {
            self.eat_name_or_reserved()
        } else {
            self.eat_name_or_static_or_reserved()
        };
        name.kind = TokenKind::Name;
        Node::token(name)
    }

    fn eat_name_or_static_or_reserved(&mut self) -> Token {
        let token = self.token();
        if token.kind == TokenKind::Name
            || token.kind == TokenKind::StaticKeyword
            || tables::is_reserved_word(token.kind)
        {
            self.advance();
            return token;
        }
        Token::missing(TokenKind::Name, token.full_start)
    }

    fn parse_relative_specifier(&mut self) -> Option<Node> {
        let namespace_keyword = self.eat_optional(TokenKind::NamespaceKeyword)?;
        let backslash = self.eat1(TokenKind::BackslashToken);
        Some(Node::RelativeSpecifier(Box::new(RelativeSpecifier {
            namespace_keyword,
            backslash,
        })))
    }

    fn parse_numeric_literal_expression(&mut self) -> Node {
        let token = self.token();
        self.advance();
        Node::NumericLiteral(Box::new(NumericLiteral { children: token }))
    }

    fn parse_reserved_word_expression(&mut self) -> Node {
        let token = self.token();
        self.advance();
        Node::ReservedWord(Box::new(ReservedWord { children: token }))
    }

    /// Template strings, heredocs and backtick strings: the open-quote
    /// token, the interleaved parts, the close-quote token.
    fn parse_template_string_literal_expression(&mut self) -> Node {
        let start_quote = self.eat_any(&[
            TokenKind::SingleQuoteToken,
            TokenKind::DoubleQuoteToken,
            TokenKind::HeredocStart,
            TokenKind::BacktickToken,
        ]);
        let mut children = Vec::new();
        loop {
            match self.token().kind {
                TokenKind::DollarOpenBraceToken | TokenKind::OpenBraceDollarToken => {
                    children.push(Node::token(self.eat_any(&[
                        TokenKind::DollarOpenBraceToken,
                        TokenKind::OpenBraceDollarToken,
                    ])));
                    if self.check(TokenKind::StringVarname) {
                        children.push(self.parse_simple_variable());
                    } else {
                        children.push(self.parse_expression());
                    }
                    children.push(Node::token(self.eat1(TokenKind::CloseBraceToken)));
                }
                kind if kind == start_quote.kind
                    || kind == TokenKind::EndOfFileToken
                    || kind == TokenKind::HeredocEnd =>
                {
                    let end_quote =
                        self.eat_any(&[start_quote.kind, TokenKind::HeredocEnd]);
                    return Node::StringLiteral(Box::new(StringLiteral {
                        start_quote: Some(start_quote),
                        children,
                        end_quote: Some(end_quote),
                    }));
                }
                TokenKind::VariableName => {
                    children.push(self.parse_template_string_expression());
                }
                _ => {
                    let token = self.token();
                    children.push(Node::token(token));
                    self.advance();
                }
            }
        }
    }

    fn parse_template_string_expression(&mut self) -> Node {
        let variable = self.parse_simple_variable();
        match self.token().kind {
            TokenKind::OpenBracketToken => self.parse_template_string_subscript(variable),
            TokenKind::ArrowToken => self.parse_template_string_member_access(variable),
            _ => variable,
        }
    }

    fn parse_template_string_subscript(&mut self, postfix_expression: Node) -> Node {
        // only [] subscripts exist inside templates
        let open_bracket_or_brace = self.eat1(TokenKind::OpenBracketToken);
        let token = self.token();
        let access_expression = match token.kind {
            TokenKind::VariableName => self.parse_simple_variable(),
            TokenKind::IntegerLiteralToken => self.parse_numeric_literal_expression(),
            TokenKind::Name => {
                let name = self.eat1(TokenKind::Name);
                Node::StringLiteral(Box::new(StringLiteral {
                    start_quote: None,
                    children: vec![Node::token(name)],
                    end_quote: None,
                }))
            }
            _ => Node::missing(TokenKind::Expression, token.full_start),
        };
        let close_bracket_or_brace = self.eat1(TokenKind::CloseBracketToken);
        Node::SubscriptExpression(Box::new(SubscriptExpression {
            postfix_expression,
            open_bracket_or_brace,
            access_expression: Some(access_expression),
            close_bracket_or_brace,
        }))
    }

    fn parse_template_string_member_access(&mut self, expression: Node) -> Node {
        let arrow_token = self.eat1(TokenKind::ArrowToken);
        let member_name = Node::token(self.eat1(TokenKind::Name));
        Node::MemberAccessExpression(Box::new(MemberAccessExpression {
            dereferencable_expression: expression,
            arrow_token,
            member_name,
        }))
    }

    fn parse_array_creation_expression(&mut self) -> Node {
        let array_keyword = self.eat_optional(TokenKind::ArrayKeyword);
        let open_paren_or_bracket = if array_keyword.is_some() {
            self.eat1(TokenKind::OpenParenToken)
        } else {
            self.eat1(TokenKind::OpenBracketToken)
        };
        let array_elements = self
            .parse_array_element_list()
            .map(|children| Node::ArrayElementList(DelimitedList { children }));
        let close_paren_or_bracket = if array_keyword.is_some() {
            self.eat1(TokenKind::CloseParenToken)
        } else {
            self.eat1(TokenKind::CloseBracketToken)
        };
        Node::ArrayCreationExpression(Box::new(ArrayCreationExpression {
            array_keyword,
            open_paren_or_bracket,
            array_elements,
            close_paren_or_bracket,
        }))
    }

    fn parse_array_element_list(&mut self) -> Option<Vec<Node>> {
        self.parse_delimited_list(
            TokenKind::CommaToken,
            |p, kind| kind == TokenKind::AmpersandToken || p.is_expression_start(kind),
            Parser::parse_array_element,
            true,
        )
    }

    fn parse_array_element(&mut self) -> Node {
        if self.check(TokenKind::AmpersandToken) {
            let by_ref = Some(self.eat1(TokenKind::AmpersandToken));
            let element_value = self.parse_expression();
            return Node::ArrayElement(Box::new(ArrayElement {
                by_ref,
                element_key: None,
                arrow_token: None,
                element_value,
            }));
        }
        let expression = self.parse_expression();
        if self.check(TokenKind::DoubleArrowToken) {
            let element_key = Some(expression);
            let arrow_token = Some(self.eat1(TokenKind::DoubleArrowToken));
            let by_ref = self.eat_optional(TokenKind::AmpersandToken);
            let element_value = self.parse_expression();
            return Node::ArrayElement(Box::new(ArrayElement {
                by_ref,
                element_key,
                arrow_token,
                element_value,
            }));
        }
        Node::ArrayElement(Box::new(ArrayElement {
            by_ref: None,
            element_key: None,
            arrow_token: None,
            element_value: expression,
        }))
    }

    fn parse_echo_expression(&mut self) -> Node {
        let echo_keyword = self.eat1(TokenKind::EchoKeyword);
        let expressions = self.parse_expression_list();
        Node::EchoExpression(Box::new(EchoExpression {
            echo_keyword,
            expressions,
        }))
    }

    fn parse_list_intrinsic_expression(&mut self) -> Node {
        let list_keyword = self.eat1(TokenKind::ListKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        // parsed loosely as array elements; a later validation pass could
        // reject what list() cannot destructure
        let list_elements = self
            .parse_array_element_list()
            .map(|children| Node::ListExpressionList(DelimitedList { children }));
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::ListIntrinsicExpression(Box::new(ListIntrinsicExpression {
            list_keyword,
            open_paren,
            list_elements,
            close_paren,
        }))
    }

    fn parse_unset_intrinsic_expression(&mut self) -> Node {
        let unset_keyword = self.eat1(TokenKind::UnsetKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expressions = self.parse_expression_list();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::UnsetIntrinsicExpression(Box::new(UnsetIntrinsicExpression {
            unset_keyword,
            open_paren,
            expressions,
            close_paren,
        }))
    }

    fn parse_empty_intrinsic_expression(&mut self) -> Node {
        let empty_keyword = self.eat1(TokenKind::EmptyKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::EmptyIntrinsicExpression(Box::new(EmptyIntrinsicExpression {
            empty_keyword,
            open_paren,
            expression,
            close_paren,
        }))
    }

    fn parse_eval_intrinsic_expression(&mut self) -> Node {
        let eval_keyword = self.eat1(TokenKind::EvalKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::EvalIntrinsicExpression(Box::new(EvalIntrinsicExpression {
            eval_keyword,
            open_paren,
            expression,
            close_paren,
        }))
    }

    fn parse_exit_intrinsic_expression(&mut self) -> Node {
        let mut exit_or_die_keyword =
            self.eat_any(&[TokenKind::ExitKeyword, TokenKind::DieKeyword]);
        // die is an alias; downstream only sees exit
        exit_or_die_keyword.kind = TokenKind::ExitKeyword;
        let open_paren = self.eat_optional(TokenKind::OpenParenToken);
        let mut expression = None;
        let mut close_paren = None;
        if open_paren.is_some() {
            if self.is_expression_start(self.token().kind) {
                expression = Some(self.parse_expression());
            }
            close_paren = Some(self.eat1(TokenKind::CloseParenToken));
        }
        Node::ExitIntrinsicExpression(Box::new(ExitIntrinsicExpression {
            exit_or_die_keyword,
            open_paren,
            expression,
            close_paren,
        }))
    }

    fn parse_isset_intrinsic_expression(&mut self) -> Node {
        let isset_keyword = self.eat1(TokenKind::IsSetKeyword);
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expressions = self.parse_expression_list();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::IssetIntrinsicExpression(Box::new(IssetIntrinsicExpression {
            isset_keyword,
            open_paren,
            expressions,
            close_paren,
        }))
    }

    fn parse_print_intrinsic_expression(&mut self) -> Node {
        let print_keyword = self.eat1(TokenKind::PrintKeyword);
        let expression = self.parse_expression();
        Node::PrintIntrinsicExpression(Box::new(PrintIntrinsicExpression {
            print_keyword,
            expression,
        }))
    }

    fn parse_parenthesized_expression(&mut self) -> Node {
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let expression = self.parse_expression();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::ParenthesizedExpression(Box::new(ParenthesizedExpression {
            open_paren,
            expression,
            close_paren,
        }))
    }

    fn parse_anonymous_function_creation_expression(&mut self) -> Node {
        let static_modifier = self.eat_optional(TokenKind::StaticKeyword);
        let (header, anonymous_function_use_clause, return_type, body) =
            self.parse_function_type(false, true);
        Node::AnonymousFunctionCreationExpression(Box::new(
            AnonymousFunctionCreationExpression {
                static_modifier,
                header,
                anonymous_function_use_clause,
                return_type,
                body,
            },
        ))
    }

    // ── postfix chains ──────────────────────────────────────────────────

    fn parse_postfix_expression_rest(&mut self, mut expression: Node, allow_update: bool) -> Node {
        let kind = self.token().kind;

        // `--$a++` is invalid; postfix update only binds on the way out
        if allow_update
            && (kind == TokenKind::PlusPlusToken || kind == TokenKind::MinusMinusToken)
        {
            return self.parse_postfix_update_expression(expression);
        }

        let dereferencable = matches!(
            expression,
            Node::Variable(_)
                | Node::ParenthesizedExpression(_)
                | Node::QualifiedName(_)
                | Node::CallExpression(_)
                | Node::MemberAccessExpression(_)
                | Node::SubscriptExpression(_)
                | Node::ScopedPropertyAccessExpression(_)
                | Node::StringLiteral(_)
                | Node::ArrayCreationExpression(_)
        );
        if !dereferencable {
            return expression;
        }

        if kind == TokenKind::ColonColonToken {
            expression = self.parse_scoped_property_access_expression(expression);
            return self.parse_postfix_expression_rest(expression, true);
        }

        loop {
            let kind = self.token().kind;
            if kind == TokenKind::OpenBraceToken || kind == TokenKind::OpenBracketToken {
                expression = self.parse_subscript_expression(expression);
                return self.parse_postfix_expression_rest(expression, true);
            }

            if matches!(expression, Node::ArrayCreationExpression(_)) {
                // only subscripts may follow an array literal
                return expression;
            }

            if kind == TokenKind::ArrowToken {
                expression = self.parse_member_access_expression(expression);
                return self.parse_postfix_expression_rest(expression, true);
            }

            if kind == TokenKind::OpenParenToken && !self.parsing_object_creation {
                expression = self.parse_call_expression_rest(expression);
                if self.check(TokenKind::OpenParenToken) {
                    // a()() keeps the second parens for an outer parse
                    return expression;
                }
                return self.parse_postfix_expression_rest(expression, true);
            }

            return expression;
        }
    }

    fn parse_postfix_update_expression(&mut self, operand: Node) -> Node {
        let increment_or_decrement_operator =
            self.eat_any(&[TokenKind::PlusPlusToken, TokenKind::MinusMinusToken]);
        Node::PostfixUpdateExpression(Box::new(PostfixUpdateExpression {
            operand,
            increment_or_decrement_operator,
        }))
    }

    fn parse_scoped_property_access_expression(&mut self, qualifier: Node) -> Node {
        let double_colon = self.eat1(TokenKind::ColonColonToken);
        let member_name = self.parse_member_name();
        Node::ScopedPropertyAccessExpression(Box::new(ScopedPropertyAccessExpression {
            scope_resolution_qualifier: qualifier,
            double_colon,
            member_name,
        }))
    }

    fn parse_member_access_expression(&mut self, expression: Node) -> Node {
        let arrow_token = self.eat1(TokenKind::ArrowToken);
        let member_name = self.parse_member_name();
        Node::MemberAccessExpression(Box::new(MemberAccessExpression {
            dereferencable_expression: expression,
            arrow_token,
            member_name,
        }))
    }

    fn parse_member_name(&mut self) -> Node {
        let token = self.token();
        match token.kind {
            TokenKind::Name => {
                self.advance();
                Node::token(token)
            }
            TokenKind::VariableName | TokenKind::DollarToken => self.parse_simple_variable(),
            TokenKind::OpenBraceToken => self.parse_braced_expression(),
            _ => {
                if tables::is_name_or_keyword_or_reserved(token.kind) {
                    self.advance();
                    let mut name = token;
                    name.kind = TokenKind::Name;
                    return Node::token(name);
                }
                Node::missing(TokenKind::MemberName, token.full_start)
            }
        }
    }

    fn parse_subscript_expression(&mut self, expression: Node) -> Node {
        let open_bracket_or_brace =
            self.eat_any(&[TokenKind::OpenBracketToken, TokenKind::OpenBraceToken]);
        let access_expression = if self.is_expression_start(self.token().kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        let close_bracket_or_brace = if open_bracket_or_brace.kind == TokenKind::OpenBraceToken {
            self.eat1(TokenKind::CloseBraceToken)
        } else {
            self.eat1(TokenKind::CloseBracketToken)
        };
        Node::SubscriptExpression(Box::new(SubscriptExpression {
            postfix_expression: expression,
            open_bracket_or_brace,
            access_expression,
            close_bracket_or_brace,
        }))
    }

    fn parse_call_expression_rest(&mut self, expression: Node) -> Node {
        let open_paren = self.eat1(TokenKind::OpenParenToken);
        let argument_expression_list = self.parse_argument_expression_list();
        let close_paren = self.eat1(TokenKind::CloseParenToken);
        Node::CallExpression(Box::new(CallExpression {
            callable_expression: expression,
            open_paren,
            argument_expression_list,
            close_paren,
        }))
    }

}

// ── free predicates (no parser state needed) ────────────────────────────

fn is_modifier(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        AbstractKeyword
            | FinalKeyword
            | PublicKeyword
            | ProtectedKeyword
            | PrivateKeyword
            | StaticKeyword
            | VarKeyword
    )
}

fn is_class_member_declaration_start(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        ConstKeyword
            | PublicKeyword
            | ProtectedKeyword
            | PrivateKeyword
            | StaticKeyword
            | AbstractKeyword
            | FinalKeyword
            | VarKeyword
            | FunctionKeyword
            | UseKeyword
    )
}

fn is_trait_member_declaration_start(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        VariableName
            | PublicKeyword
            | ProtectedKeyword
            | PrivateKeyword
            | VarKeyword
            | StaticKeyword
            | AbstractKeyword
            | FinalKeyword
            | FunctionKeyword
            | UseKeyword
    )
}

fn is_interface_member_declaration_start(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        PublicKeyword
            | ProtectedKeyword
            | PrivateKeyword
            | StaticKeyword
            | AbstractKeyword
            | FinalKeyword
            | ConstKeyword
            | FunctionKeyword
    )
}

fn is_qualified_name_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::BackslashToken | TokenKind::NamespaceKeyword | TokenKind::Name
    )
}

fn is_namespace_use_clause_start(_parser: &Parser, kind: TokenKind) -> bool {
    is_qualified_name_start(kind)
        || kind == TokenKind::FunctionKeyword
        || kind == TokenKind::ConstKeyword
}

fn is_parameter_start(_parser: &Parser, kind: TokenKind) -> bool {
    use TokenKind::*;
    match kind {
        DotDotDotToken | Name | BackslashToken | NamespaceKeyword | AmpersandToken
        | VariableName | QuestionToken => true,
        _ => PARAMETER_TYPE_KINDS.contains(&kind),
    }
}

fn is_qualified_name_part_start(parser: &Parser, kind: TokenKind) -> bool {
    if parser.lookahead(&[Look::One(TokenKind::BackslashToken)]) {
        kind == TokenKind::Name || tables::is_reserved_word(kind)
    } else {
        kind == TokenKind::Name
            || kind == TokenKind::StaticKeyword
            || tables::is_reserved_word(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use php_cst_lexer::TokenCategory;

    fn parse(source: &str) -> SourceFile {
        parse_source_file(source, None)
    }

    /// The statements after the leading inline-html node.
    fn body(file: &SourceFile) -> &[Node] {
        &file.statement_list[1..]
    }

    fn expression_of(statement: &Node) -> &Node {
        match statement {
            Node::ExpressionStatement(s) => &s.expression[0],
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn assert_round_trip(source: &str) {
        let file = parse(source);
        assert_eq!(file.reconstruct(), source, "round trip failed");
    }

    #[test]
    fn test_parse_empty_source() {
        let file = parse("");
        assert!(file.statement_list.is_empty());
        assert_eq!(file.end_of_file_token.kind, TokenKind::EndOfFileToken);
        assert_round_trip("");
    }

    #[test]
    fn test_parse_bare_open_tag() {
        let file = parse("<?php ");
        assert_eq!(file.statement_list.len(), 1);
        assert!(matches!(file.statement_list[0], Node::InlineHtml(_)));
        assert_round_trip("<?php ");
    }

    #[test]
    fn test_echo_string_statement() {
        let source = "<?php echo \"test\";";
        let file = parse(source);
        let statements = body(&file);
        assert_eq!(statements.len(), 1);
        let echo = expression_of(&statements[0]);
        let Node::EchoExpression(echo) = echo else {
            panic!("expected echo expression");
        };
        let Some(Node::ExpressionList(list)) = &echo.expressions else {
            panic!("expected expression list");
        };
        let Node::StringLiteral(string) = &list.children[0] else {
            panic!("expected string literal");
        };
        assert!(string.start_quote.is_none());
        let Node::TokenNode(inner) = &string.children[0] else {
            panic!("expected token child");
        };
        assert_eq!(inner.token.kind, TokenKind::StringLiteralToken);
        assert_eq!(inner.token.text(source), "\"test\"");
        assert_round_trip(source);
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let source = "<?php $a = 1 + 2 * 3;";
        let file = parse(source);
        let Node::AssignmentExpression(assign) = expression_of(&body(&file)[0]) else {
            panic!("expected assignment");
        };
        assert!(matches!(assign.left_operand, Node::Variable(_)));
        let Node::BinaryExpression(plus) = &assign.right_operand else {
            panic!("expected binary +");
        };
        assert_eq!(plus.operator.kind, TokenKind::PlusToken);
        assert!(matches!(plus.left_operand, Node::NumericLiteral(_)));
        let Node::BinaryExpression(times) = &plus.right_operand else {
            panic!("expected nested binary *");
        };
        assert_eq!(times.operator.kind, TokenKind::AsteriskToken);
        assert_round_trip(source);
    }

    #[test]
    fn test_assignment_chain_is_right_associative() {
        let source = "<?php $a = $b = 1;";
        let file = parse(source);
        let Node::AssignmentExpression(outer) = expression_of(&body(&file)[0]) else {
            panic!("expected assignment");
        };
        assert!(matches!(outer.right_operand, Node::AssignmentExpression(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_non_associative_equality_stops_climbing() {
        // 1 == 2 == 3 cannot chain; the second == ends up skipped
        let source = "<?php 1 == 2 == 3;";
        let file = parse(source);
        let statements = body(&file);
        let Node::BinaryExpression(eq) = expression_of(&statements[0]) else {
            panic!("expected binary ==");
        };
        assert_eq!(eq.operator.kind, TokenKind::EqualsEqualsToken);
        assert!(matches!(eq.right_operand, Node::NumericLiteral(_)));
        assert!(statements.iter().any(|s| matches!(s, Node::SkippedNode(_))));
        assert_round_trip(source);
    }

    #[test]
    fn test_power_rebinds_over_unary() {
        // -2 ** 3 is -(2 ** 3)
        let source = "<?php -2 ** 3;";
        let file = parse(source);
        let Node::UnaryOpExpression(unary) = expression_of(&body(&file)[0]) else {
            panic!("expected unary at top");
        };
        assert_eq!(unary.operator.kind, TokenKind::MinusToken);
        let Node::BinaryExpression(power) = &unary.operand else {
            panic!("expected ** inside unary");
        };
        assert_eq!(power.operator.kind, TokenKind::AsteriskAsteriskToken);
        assert_round_trip(source);
    }

    #[test]
    fn test_power_is_right_associative() {
        let source = "<?php 2 ** 3 ** 2;";
        let file = parse(source);
        let Node::BinaryExpression(outer) = expression_of(&body(&file)[0]) else {
            panic!("expected **");
        };
        assert!(matches!(outer.left_operand, Node::NumericLiteral(_)));
        assert!(matches!(outer.right_operand, Node::BinaryExpression(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_coalesce_binds_tighter_than_ternary() {
        let source = "<?php $a ?? $b ? $c : $d;";
        let file = parse(source);
        let Node::TernaryExpression(ternary) = expression_of(&body(&file)[0]) else {
            panic!("expected ternary at top");
        };
        assert!(matches!(ternary.condition, Node::BinaryExpression(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_ternary_with_empty_if_branch() {
        let source = "<?php $a ?: $b;";
        let file = parse(source);
        let Node::TernaryExpression(ternary) = expression_of(&body(&file)[0]) else {
            panic!("expected ternary");
        };
        assert!(ternary.if_expression.is_none());
        assert_round_trip(source);
    }

    #[test]
    fn test_if_elseif_mixed_forms() {
        let source = "<?php if ($a) { b(); } elseif ($c): d(); endif;";
        let file = parse(source);
        let Node::IfStatement(if_statement) = &body(&file)[0] else {
            panic!("expected if statement");
        };
        assert!(if_statement.colon.is_none());
        assert!(matches!(
            if_statement.statements[0],
            Node::CompoundStatement(_)
        ));
        assert_eq!(if_statement.else_if_clauses.len(), 1);
        let Node::ElseIfClause(else_if) = &if_statement.else_if_clauses[0] else {
            panic!("expected elseif clause");
        };
        assert!(else_if.colon.is_some());
        assert_eq!(else_if.statements.len(), 1);
        assert!(if_statement.endif_keyword.is_some());
        assert!(if_statement.semicolon.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_template_string_with_curly_variable() {
        let source = "<?php \"a{$b}c\";";
        let file = parse(source);
        let Node::StringLiteral(string) = expression_of(&body(&file)[0]) else {
            panic!("expected string literal");
        };
        assert_eq!(
            string.start_quote.map(|t| t.kind),
            Some(TokenKind::DoubleQuoteToken)
        );
        assert_eq!(string.children.len(), 5);
        let kinds: Vec<&Node> = string.children.iter().collect();
        assert!(matches!(kinds[0], Node::TokenNode(t) if t.token.kind == TokenKind::EncapsedAndWhitespace));
        assert!(matches!(kinds[1], Node::TokenNode(t) if t.token.kind == TokenKind::OpenBraceDollarToken));
        assert!(matches!(kinds[2], Node::Variable(_)));
        assert!(matches!(kinds[3], Node::TokenNode(t) if t.token.kind == TokenKind::CloseBraceToken));
        assert!(matches!(kinds[4], Node::TokenNode(t) if t.token.kind == TokenKind::EncapsedAndWhitespace));
        assert_eq!(
            string.end_quote.map(|t| t.kind),
            Some(TokenKind::DoubleQuoteToken)
        );
        assert_round_trip(source);
    }

    #[test]
    fn test_class_declaration_full_shape() {
        let source = "<?php class A extends B implements C, D { public const X = 1; function f(&$x): int { return $x; } }";
        let file = parse(source);
        let Node::ClassDeclaration(class) = &body(&file)[0] else {
            panic!("expected class declaration");
        };
        assert!(class.abstract_or_final_modifier.is_none());
        assert_eq!(class.name.text(source), "A");

        let Some(Node::ClassBaseClause(base)) = &class.class_base_clause else {
            panic!("expected base clause");
        };
        assert!(matches!(base.base_class, Some(Node::QualifiedName(_))));

        let Some(Node::ClassInterfaceClause(interfaces)) = &class.class_interface_clause else {
            panic!("expected interface clause");
        };
        let Some(Node::QualifiedNameList(names)) = &interfaces.interface_name_list else {
            panic!("expected interface name list");
        };
        // C , D — two names with the comma token between them
        assert_eq!(names.children.len(), 3);

        let Node::ClassMembers(members) = &class.class_members else {
            panic!("expected class members");
        };
        assert_eq!(members.class_member_declarations.len(), 2);
        let Node::ClassConstDeclaration(constant) = &members.class_member_declarations[0] else {
            panic!("expected const member");
        };
        assert_eq!(constant.modifiers.len(), 1);
        assert_eq!(constant.modifiers[0].kind, TokenKind::PublicKeyword);

        let Node::MethodDeclaration(method) = &members.class_member_declarations[1] else {
            panic!("expected method member");
        };
        assert!(method.modifiers.is_empty());
        let Some(Node::ParameterDeclarationList(params)) = &method.header.parameters else {
            panic!("expected parameters");
        };
        let Node::Parameter(param) = &params.children[0] else {
            panic!("expected parameter");
        };
        assert!(param.by_ref_token.is_some());
        assert_eq!(param.variable_name.text(source), "$x");
        assert!(matches!(
            &method.return_type.return_type,
            Some(Node::TokenNode(t)) if t.token.kind == TokenKind::IntReservedWord
        ));
        assert_round_trip(source);
    }

    #[test]
    fn test_error_control_chain_with_missing_expression() {
        // @@@; still parses cleanly
        let source = "<?php @@@;";
        let file = parse(source);
        let mut node = expression_of(&body(&file)[0]);
        for _ in 0..3 {
            let Node::ErrorControlExpression(inner) = node else {
                panic!("expected error-control expression");
            };
            node = &inner.operand;
        }
        assert!(node.is_missing());
        assert_round_trip(source);
    }

    #[test]
    fn test_missing_tokens_have_zero_length() {
        let source = "<?php if (";
        let file = parse(source);
        let mut missing = 0;
        for token in file.tokens() {
            if token.category == TokenCategory::Missing {
                assert_eq!(token.length, 0);
                missing += 1;
            }
        }
        assert!(missing > 0);
        assert_round_trip(source);
    }

    #[test]
    fn test_skipped_tokens_preserve_round_trip() {
        let source = "<?php class { ] } $a;";
        assert_round_trip(source);
    }

    #[test]
    fn test_tolerance_over_garbage() {
        for source in [
            "",
            "<?php ",
            "<?php '",
            "<?php \"unterminated",
            "<?php <<<EOT\nno end",
            "<?php \u{7}\u{7}\u{7}",
            "garbage only, no php",
            "<?php ) ] } ;",
        ] {
            assert_round_trip(source);
        }
    }

    #[test]
    fn test_heredoc_expression_parses_as_string() {
        let source = "<?php $a = <<<EOT\nhello $name\nEOT;\n";
        let file = parse(source);
        let Node::AssignmentExpression(assign) = expression_of(&body(&file)[0]) else {
            panic!("expected assignment");
        };
        let Node::StringLiteral(string) = &assign.right_operand else {
            panic!("expected heredoc string literal");
        };
        assert_eq!(
            string.start_quote.map(|t| t.kind),
            Some(TokenKind::HeredocStart)
        );
        assert_eq!(string.end_quote.map(|t| t.kind), Some(TokenKind::HeredocEnd));
        assert!(string
            .children
            .iter()
            .any(|c| matches!(c, Node::Variable(_))));
        assert_round_trip(source);
    }

    #[test]
    fn test_foreach_key_backtracking() {
        let with_key = parse("<?php foreach ($c as $k => $v) {}");
        let Node::ForeachStatement(foreach) = &body(&with_key)[0] else {
            panic!("expected foreach");
        };
        assert!(foreach.foreach_key.is_some());

        let without_key = parse("<?php foreach ($c as $v) {}");
        let Node::ForeachStatement(foreach) = &body(&without_key)[0] else {
            panic!("expected foreach");
        };
        assert!(foreach.foreach_key.is_none());
        assert!(matches!(foreach.foreach_value, Node::ForeachValue(_)));
    }

    #[test]
    fn test_foreach_by_ref_value() {
        let file = parse("<?php foreach ($c as &$v): endforeach;");
        let Node::ForeachStatement(foreach) = &body(&file)[0] else {
            panic!("expected foreach");
        };
        let Node::ForeachValue(value) = &foreach.foreach_value else {
            panic!("expected foreach value");
        };
        assert!(value.ampersand.is_some());
        assert!(foreach.colon.is_some());
        assert!(foreach.end_foreach.is_some());
    }

    #[test]
    fn test_switch_cases() {
        let source = "<?php switch ($a) { case 1: b(); break; default: c(); }";
        let file = parse(source);
        let Node::SwitchStatement(switch) = &body(&file)[0] else {
            panic!("expected switch");
        };
        assert!(switch.open_brace.is_some());
        assert_eq!(switch.case_statements.len(), 2);
        let Node::CaseStatement(case) = &switch.case_statements[0] else {
            panic!("expected case");
        };
        assert!(case.expression.is_some());
        assert_eq!(case.statement_list.len(), 2);
        let Node::CaseStatement(default) = &switch.case_statements[1] else {
            panic!("expected default");
        };
        assert_eq!(default.case_keyword.kind, TokenKind::DefaultKeyword);
        assert!(default.expression.is_none());
        assert_round_trip(source);
    }

    #[test]
    fn test_try_catch_finally() {
        let source = "<?php try { a(); } catch (\\Exception $e) { b(); } catch (E2 $e) { } finally { c(); }";
        let file = parse(source);
        let Node::TryStatement(try_statement) = &body(&file)[0] else {
            panic!("expected try");
        };
        assert_eq!(try_statement.catch_clauses.len(), 2);
        assert!(try_statement.finally_clause.is_some());
        let Node::CatchClause(first) = &try_statement.catch_clauses[0] else {
            panic!("expected catch");
        };
        assert_eq!(first.variable_name.text(source), "$e");
        assert_round_trip(source);
    }

    #[test]
    fn test_anonymous_function_with_use_clause() {
        let source = "<?php $f = static function (&$x) use ($y, &$z): ?A\\B { return $x; };";
        let file = parse(source);
        let Node::AssignmentExpression(assign) = expression_of(&body(&file)[0]) else {
            panic!("expected assignment");
        };
        let Node::AnonymousFunctionCreationExpression(function) = &assign.right_operand else {
            panic!("expected anonymous function");
        };
        assert!(function.static_modifier.is_some());
        assert!(function.header.name.is_none());
        let Some(Node::AnonymousFunctionUseClause(use_clause)) =
            &function.anonymous_function_use_clause
        else {
            panic!("expected use clause");
        };
        let Some(Node::UseVariableNameList(uses)) = &use_clause.use_variable_name_list else {
            panic!("expected use variable list");
        };
        // $y , &$z
        assert_eq!(uses.children.len(), 3);
        assert!(function.return_type.question_token.is_some());
        assert!(matches!(
            function.return_type.return_type,
            Some(Node::QualifiedName(_))
        ));
        assert_round_trip(source);
    }

    #[test]
    fn test_anonymous_function_name_is_skipped() {
        let source = "<?php $f = function bogus() {};";
        let file = parse(source);
        let Node::AssignmentExpression(assign) = expression_of(&body(&file)[0]) else {
            panic!("expected assignment");
        };
        let Node::AnonymousFunctionCreationExpression(function) = &assign.right_operand else {
            panic!("expected anonymous function");
        };
        assert!(matches!(function.header.name, Some(Node::SkippedNode(_))));
        assert_round_trip(source);
    }

    #[test]
    fn test_object_creation_variants() {
        let source = "<?php new A(1, 2); new class extends B { }; new $cls;";
        let file = parse(source);
        let statements = body(&file);

        let Node::ObjectCreationExpression(with_args) = expression_of(&statements[0]) else {
            panic!("expected new expression");
        };
        assert!(matches!(with_args.class_type_designator, Node::QualifiedName(_)));
        assert!(with_args.argument_expression_list.is_some());

        let Node::ObjectCreationExpression(anonymous) = expression_of(&statements[1]) else {
            panic!("expected anonymous class");
        };
        assert!(matches!(anonymous.class_type_designator, Node::TokenNode(_)));
        assert!(anonymous.class_base_clause.is_some());
        assert!(anonymous.class_members.is_some());

        let Node::ObjectCreationExpression(dynamic) = expression_of(&statements[2]) else {
            panic!("expected dynamic new");
        };
        assert!(matches!(dynamic.class_type_designator, Node::Variable(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_postfix_chain_and_double_call() {
        let source = "<?php $a->b()[0]::c();";
        assert_round_trip(source);

        // a()() does not recurse into a second call
        let file = parse("<?php a()(1);");
        let statements = body(&file);
        let Node::CallExpression(call) = expression_of(&statements[0]) else {
            panic!("expected call");
        };
        assert!(matches!(call.callable_expression, Node::QualifiedName(_)));
    }

    #[test]
    fn test_postfix_update_expression() {
        let source = "<?php $a++; --$b;";
        let file = parse(source);
        let statements = body(&file);
        assert!(matches!(
            expression_of(&statements[0]),
            Node::PostfixUpdateExpression(_)
        ));
        assert!(matches!(
            expression_of(&statements[1]),
            Node::PrefixUpdateExpression(_)
        ));
        assert_round_trip(source);
    }

    #[test]
    fn test_cast_expressions() {
        let source = "<?php (int)$a; (integer) $b;";
        let file = parse(source);
        let statements = body(&file);
        let Node::CastExpression(lexed) = expression_of(&statements[0]) else {
            panic!("expected cast");
        };
        assert_eq!(lexed.cast_type.kind, TokenKind::IntCastToken);
        assert!(lexed.open_paren.is_none());

        let Node::CastExpression(granular) = expression_of(&statements[1]) else {
            panic!("expected granular cast");
        };
        assert!(granular.open_paren.is_some());
        assert_eq!(granular.cast_type.kind, TokenKind::IntegerReservedWord);
        assert_round_trip(source);
    }

    #[test]
    fn test_yield_and_yield_from() {
        let source = "<?php function g() { yield 1 => 2; yield from $xs; }";
        let file = parse(source);
        let Node::FunctionDeclaration(function) = &body(&file)[0] else {
            panic!("expected function");
        };
        let Node::CompoundStatement(function_body) = &function.body.compound_statement_or_semicolon
        else {
            panic!("expected body");
        };
        let Node::YieldExpression(first) = expression_of(&function_body.statements[0]) else {
            panic!("expected yield");
        };
        assert_eq!(first.yield_or_yield_from_keyword.kind, TokenKind::YieldKeyword);
        let Node::ArrayElement(element) = &first.array_element else {
            panic!("expected array element");
        };
        assert!(element.element_key.is_some());

        let Node::YieldExpression(second) = expression_of(&function_body.statements[1]) else {
            panic!("expected yield from");
        };
        assert_eq!(
            second.yield_or_yield_from_keyword.kind,
            TokenKind::YieldFromKeyword
        );
        assert_round_trip(source);
    }

    #[test]
    fn test_reserved_words_as_expressions_and_names() {
        let source = "<?php true; true(); a\\true\\b();";
        let file = parse(source);
        let statements = body(&file);
        assert!(matches!(expression_of(&statements[0]), Node::ReservedWord(_)));
        assert!(matches!(expression_of(&statements[1]), Node::CallExpression(_)));
        assert!(matches!(expression_of(&statements[2]), Node::CallExpression(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_static_disambiguation() {
        let source = "<?php static::m(); static $v = 1; $f = static function () {};";
        let file = parse(source);
        let statements = body(&file);
        assert!(matches!(
            expression_of(&statements[0]),
            Node::CallExpression(_)
        ));
        assert!(matches!(statements[1], Node::FunctionStaticDeclaration(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_namespace_definition_and_use() {
        let source = "<?php namespace A\\B; use function C\\d as e; use X\\{Y, const Z};";
        let file = parse(source);
        let statements = body(&file);
        assert!(matches!(statements[0], Node::NamespaceDefinition(_)));
        let Node::NamespaceUseDeclaration(use_function) = &statements[1] else {
            panic!("expected use declaration");
        };
        assert_eq!(
            use_function.function_or_const.map(|t| t.kind),
            Some(TokenKind::FunctionKeyword)
        );
        let Node::NamespaceUseDeclaration(group) = &statements[2] else {
            panic!("expected group use declaration");
        };
        let Some(Node::NamespaceUseClauseList(clauses)) = &group.use_clauses else {
            panic!("expected use clause list");
        };
        let Node::NamespaceUseClause(clause) = &clauses.children[0] else {
            panic!("expected use clause");
        };
        assert!(clause.open_brace.is_some());
        assert!(clause.group_clauses.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_namespace_relative_name_is_expression() {
        let source = "<?php namespace\\f();";
        let file = parse(source);
        let Node::CallExpression(call) = expression_of(&body(&file)[0]) else {
            panic!("expected call");
        };
        let Node::QualifiedName(name) = &call.callable_expression else {
            panic!("expected qualified name");
        };
        assert!(name.relative_specifier.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_trait_declaration_with_use_aliases() {
        let source = "<?php trait T { use A, B { A::x insteadof B; B::y as protected z; } }";
        let file = parse(source);
        let Node::TraitDeclaration(trait_declaration) = &body(&file)[0] else {
            panic!("expected trait");
        };
        let Node::TraitMembers(members) = &trait_declaration.trait_members else {
            panic!("expected trait members");
        };
        let Node::TraitUseClause(use_clause) = &members.trait_member_declarations[0] else {
            panic!("expected trait use");
        };
        assert_eq!(
            use_clause.semicolon_or_open_brace.kind,
            TokenKind::OpenBraceToken
        );
        assert!(use_clause.trait_select_and_alias_clauses.is_some());
        assert!(use_clause.close_brace.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_interface_declaration() {
        let source = "<?php interface I extends J, K { const C = 1; function m(): void; }";
        let file = parse(source);
        let Node::InterfaceDeclaration(interface) = &body(&file)[0] else {
            panic!("expected interface");
        };
        assert!(interface.interface_base_clause.is_some());
        let Node::InterfaceMembers(members) = &interface.interface_members else {
            panic!("expected members");
        };
        assert_eq!(members.interface_member_declarations.len(), 2);
        // the abstract method body is just the semicolon
        let Node::MethodDeclaration(method) = &members.interface_member_declarations[1] else {
            panic!("expected method");
        };
        assert!(matches!(
            &method.body.compound_statement_or_semicolon,
            Node::TokenNode(t) if t.token.kind == TokenKind::SemicolonToken
        ));
        assert_round_trip(source);
    }

    #[test]
    fn test_modifier_run_without_member_is_missing_member() {
        let source = "<?php class A { public static ; }";
        let file = parse(source);
        let Node::ClassDeclaration(class) = &body(&file)[0] else {
            panic!("expected class");
        };
        let Node::ClassMembers(members) = &class.class_members else {
            panic!("expected members");
        };
        assert!(members
            .class_member_declarations
            .iter()
            .any(|m| matches!(m, Node::MissingMemberDeclaration(_))));
        assert_round_trip(source);
    }

    #[test]
    fn test_list_recovery_bubbles_to_enclosing_context() {
        // the stray `case` inside the while body belongs to the enclosing
        // switch, so the while's statement list must stop, not skip it
        let source = "<?php switch ($a) { case 1: while ($b) { c(); case 2: d(); }";
        assert_round_trip(source);
        let file = parse(source);
        let Node::SwitchStatement(switch) = &body(&file)[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch.case_statements.len(), 2);
    }

    #[test]
    fn test_global_and_static_declarations() {
        let source = "<?php global $a, $b; static $c = 1, $d;";
        let file = parse(source);
        let statements = body(&file);
        let Node::GlobalDeclaration(global) = &statements[0] else {
            panic!("expected global");
        };
        let Some(Node::VariableNameList(names)) = &global.variable_name_list else {
            panic!("expected variable list");
        };
        assert_eq!(names.children.len(), 3);
        assert!(matches!(statements[1], Node::FunctionStaticDeclaration(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_array_creation_both_forms() {
        let source = "<?php [1, 2 => &$b, ]; array('k' => 'v');";
        let file = parse(source);
        let statements = body(&file);
        let Node::ArrayCreationExpression(short) = expression_of(&statements[0]) else {
            panic!("expected array");
        };
        assert!(short.array_keyword.is_none());
        let Node::ArrayCreationExpression(long) = expression_of(&statements[1]) else {
            panic!("expected array()");
        };
        assert!(long.array_keyword.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_subscript_after_array_literal_but_nothing_else() {
        let source = "<?php [1, 2][0];";
        let file = parse(source);
        assert!(matches!(
            expression_of(&body(&file)[0]),
            Node::SubscriptExpression(_)
        ));
        assert_round_trip(source);
    }

    #[test]
    fn test_script_end_tag_terminates_statement() {
        let source = "<?php echo 1 ?>html";
        let file = parse(source);
        let Node::ExpressionStatement(statement) = &body(&file)[0] else {
            panic!("expected expression statement");
        };
        assert!(statement.semicolon.is_none());
        assert_round_trip(source);
    }

    #[test]
    fn test_html_interleaving_round_trip() {
        let source = "a<?php $x; ?>b<?php $y; ?>c";
        assert_round_trip(source);
    }

    #[test]
    fn test_parent_integrity() {
        // every child reported by the walk has the node that owns it
        // as parent
        let source = "<?php if ($a) { $b = [1, 2]; } else { f(); }";
        let file = parse(source);
        let mut count = 0;
        file.walk(&mut |parent, child| {
            if let Some(parent) = parent {
                let owns = parent
                    .slots()
                    .iter()
                    .any(|slot| matches!(slot, Slot::Node(n) if std::ptr::eq(*n, child)));
                assert!(owns, "child not found in parent's slots");
            }
            count += 1;
        });
        assert!(count > 10);
    }

    #[test]
    fn test_reparse_of_reconstruction_is_identical() {
        let source = "<?php class A { function f() { return [1, \"x$y\", 2 ** -3]; } }";
        let first = parse(source);
        let second = parse(&first.reconstruct());
        assert_eq!(first.statement_list, second.statement_list);
    }

    #[test]
    fn test_expression_statement_swallows_unplaceable_token() {
        // an expression was required, the token fits nothing, and it is
        // kept as skipped so no bytes are lost
        let source = "<?php if ($a) ] ;";
        assert_round_trip(source);
    }

    #[test]
    fn test_declare_statement_forms() {
        let source = "<?php declare(strict_types=1); declare(ticks=1): enddeclare;";
        let file = parse(source);
        let statements = body(&file);
        let Node::DeclareStatement(simple) = &statements[0] else {
            panic!("expected declare");
        };
        assert!(simple.semicolon.is_some());
        let Node::DeclareStatement(block) = &statements[1] else {
            panic!("expected declare block");
        };
        assert!(block.colon.is_some());
        assert!(block.enddeclare_keyword.is_some());
        assert_round_trip(source);
    }

    #[test]
    fn test_goto_and_label() {
        let source = "<?php start: a(); goto start;";
        let file = parse(source);
        let statements = body(&file);
        assert!(matches!(statements[0], Node::NamedLabelStatement(_)));
        assert!(matches!(statements[1], Node::GotoStatement(_)));
        assert_round_trip(source);
    }

    #[test]
    fn test_exit_die_normalized() {
        let source = "<?php die(1); exit;";
        let file = parse(source);
        let statements = body(&file);
        let Node::ExitIntrinsicExpression(die) = expression_of(&statements[0]) else {
            panic!("expected exit intrinsic");
        };
        assert_eq!(die.exit_or_die_keyword.kind, TokenKind::ExitKeyword);
        assert_eq!(die.exit_or_die_keyword.text(source), "die");
        assert_round_trip(source);
    }

    #[test]
    fn test_dynamic_variables() {
        let source = "<?php $$a; ${'x'}; $a->$b; A::$c;";
        assert_round_trip(source);
        let file = parse(source);
        let Node::Variable(variable) = expression_of(&body(&file)[0]) else {
            panic!("expected variable");
        };
        assert!(variable.dollar.is_some());
        assert!(matches!(variable.name, Node::Variable(_)));
    }
}
