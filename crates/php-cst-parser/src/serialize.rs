//! JSON projection of the CST.
//!
//! The shape is the stable external contract used by golden-file tooling:
//!
//! - a node is `{"VariantName": {field: value, ...}}` with field names
//!   lowercased at the first letter;
//! - the root's source text and uri are omitted, and parent links do not
//!   exist in the serialized form at all (the tree is ownership-based, so
//!   the original cycle guard degenerates to nothing);
//! - the function-like composition (header / return type / body) is
//!   flattened into the enclosing variant;
//! - statement-or-statement-list slots collapse a one-element list to the
//!   element itself;
//! - a token is `{kind, fullStart, start, length}` and a token-wrapper
//!   node is just its token;
//! - absent optional slots serialize as `null`.

use php_cst_lexer::Token;
use serde_json::{Map, Value};

use crate::node::*;

/// The JSON value for a whole parse tree.
pub fn serialize(file: &SourceFile) -> Value {
    wrap(
        "SourceFile",
        vec![
            ("statementList", nodes(&file.statement_list)),
            ("endOfFileToken", token(&file.end_of_file_token)),
        ],
    )
}

/// Four-space-indented JSON bytes.
pub fn pretty_print(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(value, &mut serializer)
        .expect("a CST projection is always valid JSON");
    out
}

fn wrap(name: &str, fields: Vec<(&'static str, Value)>) -> Value {
    let mut inner = Map::new();
    for (key, value) in fields {
        inner.insert(key.to_string(), value);
    }
    let mut outer = Map::new();
    outer.insert(name.to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn token(token: &Token) -> Value {
    let mut map = Map::new();
    map.insert("kind".to_string(), Value::from(token.kind.name()));
    map.insert("fullStart".to_string(), Value::from(token.full_start as u64));
    map.insert("start".to_string(), Value::from(token.start as u64));
    map.insert("length".to_string(), Value::from(token.length as u64));
    Value::Object(map)
}

fn opt_token(value: &Option<Token>) -> Value {
    match value {
        Some(t) => token(t),
        None => Value::Null,
    }
}

fn tokens(values: &[Token]) -> Value {
    Value::Array(values.iter().map(token).collect())
}

fn opt_node(value: &Option<Node>) -> Value {
    match value {
        Some(n) => node(n),
        None => Value::Null,
    }
}

fn nodes(values: &[Node]) -> Value {
    Value::Array(values.iter().map(node).collect())
}

/// Single-child collapse: a one-element list serializes as the element.
fn collapsed(values: &[Node]) -> Value {
    if values.len() == 1 {
        node(&values[0])
    } else {
        nodes(values)
    }
}

fn function_header_fields(header: &FunctionHeader, fields: &mut Vec<(&'static str, Value)>) {
    fields.push(("functionKeyword", token(&header.function_keyword)));
    fields.push(("byRefToken", opt_token(&header.by_ref_token)));
    fields.push(("name", opt_node(&header.name)));
    fields.push(("openParen", token(&header.open_paren)));
    fields.push(("parameters", opt_node(&header.parameters)));
    fields.push(("closeParen", token(&header.close_paren)));
}

fn function_return_type_fields(
    return_type: &FunctionReturnType,
    fields: &mut Vec<(&'static str, Value)>,
) {
    fields.push(("colonToken", opt_token(&return_type.colon_token)));
    fields.push(("questionToken", opt_token(&return_type.question_token)));
    fields.push(("returnType", opt_node(&return_type.return_type)));
}

fn function_body_fields(body: &FunctionBody, fields: &mut Vec<(&'static str, Value)>) {
    fields.push((
        "compoundStatementOrSemicolon",
        node(&body.compound_statement_or_semicolon),
    ));
}

fn list(name: &'static str, list: &DelimitedList) -> Value {
    wrap(name, vec![("children", nodes(&list.children))])
}

fn node(n: &Node) -> Value {
    match n {
        // a token-wrapper node is just the token
        Node::TokenNode(v) => token(&v.token),
        Node::SkippedNode(v) => wrap("SkippedNode", vec![("token", token(&v.token))]),
        Node::MissingNode(v) => wrap("MissingNode", vec![("token", token(&v.token))]),

        Node::ExpressionList(v) => list("ExpressionList", v),
        Node::ConstElementList(v) => list("ConstElementList", v),
        Node::ParameterDeclarationList(v) => list("ParameterDeclarationList", v),
        Node::UseVariableNameList(v) => list("UseVariableNameList", v),
        Node::QualifiedNameList(v) => list("QualifiedNameList", v),
        Node::ArrayElementList(v) => list("ArrayElementList", v),
        Node::ListExpressionList(v) => list("ListExpressionList", v),
        Node::ArgumentExpressionList(v) => list("ArgumentExpressionList", v),
        Node::NamespaceUseClauseList(v) => list("NamespaceUseClauseList", v),
        Node::NamespaceUseGroupClauseList(v) => list("NamespaceUseGroupClauseList", v),
        Node::TraitSelectOrAliasClauseList(v) => list("TraitSelectOrAliasClauseList", v),
        Node::StaticVariableNameList(v) => list("StaticVariableNameList", v),
        Node::VariableNameList(v) => list("VariableNameList", v),

        Node::UnaryOpExpression(v) => wrap(
            "UnaryOpExpression",
            vec![("operator", token(&v.operator)), ("operand", node(&v.operand))],
        ),
        Node::ErrorControlExpression(v) => wrap(
            "ErrorControlExpression",
            vec![("operator", token(&v.operator)), ("operand", node(&v.operand))],
        ),
        Node::PrefixUpdateExpression(v) => wrap(
            "PrefixUpdateExpression",
            vec![
                (
                    "incrementOrDecrementOperator",
                    token(&v.increment_or_decrement_operator),
                ),
                ("operand", node(&v.operand)),
            ],
        ),
        Node::PostfixUpdateExpression(v) => wrap(
            "PostfixUpdateExpression",
            vec![
                ("operand", node(&v.operand)),
                (
                    "incrementOrDecrementOperator",
                    token(&v.increment_or_decrement_operator),
                ),
            ],
        ),
        Node::BinaryExpression(v) => wrap(
            "BinaryExpression",
            vec![
                ("leftOperand", node(&v.left_operand)),
                ("operator", token(&v.operator)),
                ("rightOperand", node(&v.right_operand)),
            ],
        ),
        Node::AssignmentExpression(v) => wrap(
            "AssignmentExpression",
            vec![
                ("leftOperand", node(&v.left_operand)),
                ("operator", token(&v.operator)),
                ("byRef", opt_token(&v.by_ref)),
                ("rightOperand", node(&v.right_operand)),
            ],
        ),
        Node::TernaryExpression(v) => wrap(
            "TernaryExpression",
            vec![
                ("condition", node(&v.condition)),
                ("questionToken", token(&v.question_token)),
                ("ifExpression", opt_node(&v.if_expression)),
                ("colonToken", token(&v.colon_token)),
                ("elseExpression", node(&v.else_expression)),
            ],
        ),
        Node::CastExpression(v) => wrap(
            "CastExpression",
            vec![
                ("openParen", opt_token(&v.open_paren)),
                ("castType", token(&v.cast_type)),
                ("closeParen", opt_token(&v.close_paren)),
                ("operand", node(&v.operand)),
            ],
        ),
        Node::ObjectCreationExpression(v) => wrap(
            "ObjectCreationExpression",
            vec![
                ("newKeyword", token(&v.new_keyword)),
                ("classTypeDesignator", node(&v.class_type_designator)),
                ("openParen", opt_token(&v.open_paren)),
                (
                    "argumentExpressionList",
                    opt_node(&v.argument_expression_list),
                ),
                ("closeParen", opt_token(&v.close_paren)),
                ("classBaseClause", opt_node(&v.class_base_clause)),
                ("classInterfaceClause", opt_node(&v.class_interface_clause)),
                ("classMembers", opt_node(&v.class_members)),
            ],
        ),
        Node::CloneExpression(v) => wrap(
            "CloneExpression",
            vec![
                ("cloneKeyword", token(&v.clone_keyword)),
                ("expression", node(&v.expression)),
            ],
        ),
        Node::YieldExpression(v) => wrap(
            "YieldExpression",
            vec![
                (
                    "yieldOrYieldFromKeyword",
                    token(&v.yield_or_yield_from_keyword),
                ),
                ("arrayElement", node(&v.array_element)),
            ],
        ),
        Node::ScriptInclusionExpression(v) => wrap(
            "ScriptInclusionExpression",
            vec![
                (
                    "requireOrIncludeKeyword",
                    token(&v.require_or_include_keyword),
                ),
                ("expression", node(&v.expression)),
            ],
        ),
        Node::Variable(v) => wrap(
            "Variable",
            vec![("dollar", opt_token(&v.dollar)), ("name", node(&v.name))],
        ),
        Node::BracedExpression(v) => wrap(
            "BracedExpression",
            vec![
                ("openBrace", token(&v.open_brace)),
                ("expression", node(&v.expression)),
                ("closeBrace", token(&v.close_brace)),
            ],
        ),
        Node::QualifiedName(v) => wrap(
            "QualifiedName",
            vec![
                ("relativeSpecifier", opt_node(&v.relative_specifier)),
                ("globalSpecifier", opt_token(&v.global_specifier)),
                ("nameParts", nodes(&v.name_parts)),
            ],
        ),
        Node::RelativeSpecifier(v) => wrap(
            "RelativeSpecifier",
            vec![
                ("namespaceKeyword", token(&v.namespace_keyword)),
                ("backslash", token(&v.backslash)),
            ],
        ),
        Node::NumericLiteral(v) => {
            wrap("NumericLiteral", vec![("children", token(&v.children))])
        }
        Node::StringLiteral(v) => wrap(
            "StringLiteral",
            vec![
                ("startQuote", opt_token(&v.start_quote)),
                ("children", collapsed(&v.children)),
                ("endQuote", opt_token(&v.end_quote)),
            ],
        ),
        Node::ReservedWord(v) => wrap("ReservedWord", vec![("children", token(&v.children))]),
        Node::ArrayCreationExpression(v) => wrap(
            "ArrayCreationExpression",
            vec![
                ("arrayKeyword", opt_token(&v.array_keyword)),
                ("openParenOrBracket", token(&v.open_paren_or_bracket)),
                ("arrayElements", opt_node(&v.array_elements)),
                ("closeParenOrBracket", token(&v.close_paren_or_bracket)),
            ],
        ),
        Node::ArrayElement(v) => wrap(
            "ArrayElement",
            vec![
                ("byRef", opt_token(&v.by_ref)),
                ("elementKey", opt_node(&v.element_key)),
                ("arrowToken", opt_token(&v.arrow_token)),
                ("elementValue", node(&v.element_value)),
            ],
        ),
        Node::EchoExpression(v) => wrap(
            "EchoExpression",
            vec![
                ("echoKeyword", token(&v.echo_keyword)),
                ("expressions", opt_node(&v.expressions)),
            ],
        ),
        Node::ListIntrinsicExpression(v) => wrap(
            "ListIntrinsicExpression",
            vec![
                ("listKeyword", token(&v.list_keyword)),
                ("openParen", token(&v.open_paren)),
                ("listElements", opt_node(&v.list_elements)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::UnsetIntrinsicExpression(v) => wrap(
            "UnsetIntrinsicExpression",
            vec![
                ("unsetKeyword", token(&v.unset_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expressions", opt_node(&v.expressions)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::EmptyIntrinsicExpression(v) => wrap(
            "EmptyIntrinsicExpression",
            vec![
                ("emptyKeyword", token(&v.empty_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::EvalIntrinsicExpression(v) => wrap(
            "EvalIntrinsicExpression",
            vec![
                ("evalKeyword", token(&v.eval_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::ExitIntrinsicExpression(v) => wrap(
            "ExitIntrinsicExpression",
            vec![
                ("exitOrDieKeyword", token(&v.exit_or_die_keyword)),
                ("openParen", opt_token(&v.open_paren)),
                ("expression", opt_node(&v.expression)),
                ("closeParen", opt_token(&v.close_paren)),
            ],
        ),
        Node::IssetIntrinsicExpression(v) => wrap(
            "IssetIntrinsicExpression",
            vec![
                ("issetKeyword", token(&v.isset_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expressions", opt_node(&v.expressions)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::PrintIntrinsicExpression(v) => wrap(
            "PrintIntrinsicExpression",
            vec![
                ("printKeyword", token(&v.print_keyword)),
                ("expression", node(&v.expression)),
            ],
        ),
        Node::ParenthesizedExpression(v) => wrap(
            "ParenthesizedExpression",
            vec![
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::AnonymousFunctionCreationExpression(v) => {
            let mut fields = vec![("staticModifier", opt_token(&v.static_modifier))];
            function_header_fields(&v.header, &mut fields);
            fields.push((
                "anonymousFunctionUseClause",
                opt_node(&v.anonymous_function_use_clause),
            ));
            function_return_type_fields(&v.return_type, &mut fields);
            function_body_fields(&v.body, &mut fields);
            wrap("AnonymousFunctionCreationExpression", fields)
        }
        Node::AnonymousFunctionUseClause(v) => wrap(
            "AnonymousFunctionUseClause",
            vec![
                ("useKeyword", token(&v.use_keyword)),
                ("openParen", token(&v.open_paren)),
                ("useVariableNameList", opt_node(&v.use_variable_name_list)),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::UseVariableName(v) => wrap(
            "UseVariableName",
            vec![
                ("byRef", opt_token(&v.by_ref)),
                ("variableName", token(&v.variable_name)),
            ],
        ),
        Node::SubscriptExpression(v) => wrap(
            "SubscriptExpression",
            vec![
                ("postfixExpression", node(&v.postfix_expression)),
                ("openBracketOrBrace", token(&v.open_bracket_or_brace)),
                ("accessExpression", opt_node(&v.access_expression)),
                ("closeBracketOrBrace", token(&v.close_bracket_or_brace)),
            ],
        ),
        Node::MemberAccessExpression(v) => wrap(
            "MemberAccessExpression",
            vec![
                (
                    "dereferencableExpression",
                    node(&v.dereferencable_expression),
                ),
                ("arrowToken", token(&v.arrow_token)),
                ("memberName", node(&v.member_name)),
            ],
        ),
        Node::ScopedPropertyAccessExpression(v) => wrap(
            "ScopedPropertyAccessExpression",
            vec![
                (
                    "scopeResolutionQualifier",
                    node(&v.scope_resolution_qualifier),
                ),
                ("doubleColon", token(&v.double_colon)),
                ("memberName", node(&v.member_name)),
            ],
        ),
        Node::CallExpression(v) => wrap(
            "CallExpression",
            vec![
                ("callableExpression", node(&v.callable_expression)),
                ("openParen", token(&v.open_paren)),
                (
                    "argumentExpressionList",
                    opt_node(&v.argument_expression_list),
                ),
                ("closeParen", token(&v.close_paren)),
            ],
        ),
        Node::ArgumentExpression(v) => wrap(
            "ArgumentExpression",
            vec![
                ("byRefToken", opt_token(&v.by_ref_token)),
                ("dotDotDotToken", opt_token(&v.dot_dot_dot_token)),
                ("expression", node(&v.expression)),
            ],
        ),
        Node::Parameter(v) => wrap(
            "Parameter",
            vec![
                ("questionToken", opt_token(&v.question_token)),
                ("typeDeclaration", opt_node(&v.type_declaration)),
                ("byRefToken", opt_token(&v.by_ref_token)),
                ("dotDotDotToken", opt_token(&v.dot_dot_dot_token)),
                ("variableName", token(&v.variable_name)),
                ("equalsToken", opt_token(&v.equals_token)),
                ("default", opt_node(&v.default)),
            ],
        ),

        Node::InlineHtml(v) => wrap(
            "InlineHtml",
            vec![
                ("scriptSectionEndTag", opt_token(&v.script_section_end_tag)),
                ("text", opt_token(&v.text)),
                (
                    "scriptSectionStartTag",
                    opt_token(&v.script_section_start_tag),
                ),
            ],
        ),
        Node::CompoundStatement(v) => wrap(
            "CompoundStatement",
            vec![
                ("openBrace", token(&v.open_brace)),
                ("statements", nodes(&v.statements)),
                ("closeBrace", token(&v.close_brace)),
            ],
        ),
        Node::ExpressionStatement(v) => wrap(
            "ExpressionStatement",
            vec![
                ("expression", collapsed(&v.expression)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::EmptyStatement(v) => {
            wrap("EmptyStatement", vec![("semicolon", token(&v.semicolon))])
        }
        Node::NamedLabelStatement(v) => wrap(
            "NamedLabelStatement",
            vec![
                ("name", token(&v.name)),
                ("colon", token(&v.colon)),
                ("statement", node(&v.statement)),
            ],
        ),
        Node::IfStatement(v) => wrap(
            "IfStatement",
            vec![
                ("ifKeyword", token(&v.if_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
                ("elseIfClauses", nodes(&v.else_if_clauses)),
                ("elseClause", opt_node(&v.else_clause)),
                ("endifKeyword", opt_token(&v.endif_keyword)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::ElseIfClause(v) => wrap(
            "ElseIfClause",
            vec![
                ("elseIfKeyword", token(&v.else_if_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
            ],
        ),
        Node::ElseClause(v) => wrap(
            "ElseClause",
            vec![
                ("elseKeyword", token(&v.else_keyword)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
            ],
        ),
        Node::SwitchStatement(v) => wrap(
            "SwitchStatement",
            vec![
                ("switchKeyword", token(&v.switch_keyword)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
                ("openBrace", opt_token(&v.open_brace)),
                ("colon", opt_token(&v.colon)),
                ("caseStatements", nodes(&v.case_statements)),
                ("closeBrace", opt_token(&v.close_brace)),
                ("endswitch", opt_token(&v.endswitch)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::CaseStatement(v) => wrap(
            "CaseStatement",
            vec![
                ("caseKeyword", token(&v.case_keyword)),
                ("expression", opt_node(&v.expression)),
                (
                    "defaultLabelTerminator",
                    token(&v.default_label_terminator),
                ),
                ("statementList", nodes(&v.statement_list)),
            ],
        ),
        Node::WhileStatement(v) => wrap(
            "WhileStatement",
            vec![
                ("whileToken", token(&v.while_token)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
                ("endWhile", opt_token(&v.end_while)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::DoStatement(v) => wrap(
            "DoStatement",
            vec![
                ("do", token(&v.do_keyword)),
                ("statement", node(&v.statement)),
                ("whileToken", token(&v.while_token)),
                ("openParen", token(&v.open_paren)),
                ("expression", node(&v.expression)),
                ("closeParen", token(&v.close_paren)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::ForStatement(v) => wrap(
            "ForStatement",
            vec![
                ("for", token(&v.for_keyword)),
                ("openParen", token(&v.open_paren)),
                ("forInitializer", opt_node(&v.for_initializer)),
                ("exprGroupSemicolon1", token(&v.expr_group_semicolon1)),
                ("forControl", opt_node(&v.for_control)),
                ("exprGroupSemicolon2", token(&v.expr_group_semicolon2)),
                ("forEndOfLoop", opt_node(&v.for_end_of_loop)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
                ("endFor", opt_token(&v.end_for)),
                ("endForSemicolon", opt_token(&v.end_for_semicolon)),
            ],
        ),
        Node::ForeachStatement(v) => wrap(
            "ForeachStatement",
            vec![
                ("foreach", token(&v.foreach)),
                ("openParen", token(&v.open_paren)),
                (
                    "forEachCollectionName",
                    node(&v.for_each_collection_name),
                ),
                ("asKeyword", token(&v.as_keyword)),
                ("foreachKey", opt_node(&v.foreach_key)),
                ("foreachValue", node(&v.foreach_value)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
                ("endForeach", opt_token(&v.end_foreach)),
                ("endForeachSemicolon", opt_token(&v.end_foreach_semicolon)),
            ],
        ),
        Node::ForeachKey(v) => wrap(
            "ForeachKey",
            vec![("expression", node(&v.expression)), ("arrow", token(&v.arrow))],
        ),
        Node::ForeachValue(v) => wrap(
            "ForeachValue",
            vec![
                ("ampersand", opt_token(&v.ampersand)),
                ("expression", node(&v.expression)),
            ],
        ),
        Node::GotoStatement(v) => wrap(
            "GotoStatement",
            vec![
                ("goto", token(&v.goto_keyword)),
                ("name", token(&v.name)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::BreakOrContinueStatement(v) => wrap(
            "BreakOrContinueStatement",
            vec![
                (
                    "breakOrContinueKeyword",
                    token(&v.break_or_continue_keyword),
                ),
                ("breakoutLevel", opt_node(&v.breakout_level)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::ReturnStatement(v) => wrap(
            "ReturnStatement",
            vec![
                ("returnKeyword", token(&v.return_keyword)),
                ("expression", opt_node(&v.expression)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::ThrowStatement(v) => wrap(
            "ThrowStatement",
            vec![
                ("throwKeyword", token(&v.throw_keyword)),
                ("expression", node(&v.expression)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::TryStatement(v) => wrap(
            "TryStatement",
            vec![
                ("tryKeyword", token(&v.try_keyword)),
                ("compoundStatement", node(&v.compound_statement)),
                ("catchClauses", nodes(&v.catch_clauses)),
                ("finallyClause", opt_node(&v.finally_clause)),
            ],
        ),
        Node::CatchClause(v) => wrap(
            "CatchClause",
            vec![
                ("catch", token(&v.catch)),
                ("openParen", token(&v.open_paren)),
                ("qualifiedName", opt_node(&v.qualified_name)),
                ("variableName", token(&v.variable_name)),
                ("closeParen", token(&v.close_paren)),
                ("compoundStatement", node(&v.compound_statement)),
            ],
        ),
        Node::FinallyClause(v) => wrap(
            "FinallyClause",
            vec![
                ("finallyToken", token(&v.finally_token)),
                ("compoundStatement", node(&v.compound_statement)),
            ],
        ),
        Node::DeclareStatement(v) => wrap(
            "DeclareStatement",
            vec![
                ("declareKeyword", token(&v.declare_keyword)),
                ("openParen", token(&v.open_paren)),
                ("declareDirective", node(&v.declare_directive)),
                ("closeParen", token(&v.close_paren)),
                ("colon", opt_token(&v.colon)),
                ("statements", collapsed(&v.statements)),
                ("enddeclareKeyword", opt_token(&v.enddeclare_keyword)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::DeclareDirective(v) => wrap(
            "DeclareDirective",
            vec![
                ("name", token(&v.name)),
                ("equals", token(&v.equals)),
                ("literal", token(&v.literal)),
            ],
        ),

        Node::FunctionDeclaration(v) => {
            let mut fields = Vec::new();
            function_header_fields(&v.header, &mut fields);
            function_return_type_fields(&v.return_type, &mut fields);
            function_body_fields(&v.body, &mut fields);
            wrap("FunctionDeclaration", fields)
        }
        Node::MethodDeclaration(v) => {
            let mut fields = vec![("modifiers", tokens(&v.modifiers))];
            function_header_fields(&v.header, &mut fields);
            function_return_type_fields(&v.return_type, &mut fields);
            function_body_fields(&v.body, &mut fields);
            wrap("MethodDeclaration", fields)
        }
        Node::ClassDeclaration(v) => wrap(
            "ClassDeclaration",
            vec![
                (
                    "abstractOrFinalModifier",
                    opt_token(&v.abstract_or_final_modifier),
                ),
                ("classKeyword", token(&v.class_keyword)),
                ("name", token(&v.name)),
                ("classBaseClause", opt_node(&v.class_base_clause)),
                ("classInterfaceClause", opt_node(&v.class_interface_clause)),
                ("classMembers", node(&v.class_members)),
            ],
        ),
        Node::ClassMembers(v) => wrap(
            "ClassMembers",
            vec![
                ("openBrace", token(&v.open_brace)),
                (
                    "classMemberDeclarations",
                    nodes(&v.class_member_declarations),
                ),
                ("closeBrace", token(&v.close_brace)),
            ],
        ),
        Node::ClassBaseClause(v) => wrap(
            "ClassBaseClause",
            vec![
                ("extendsKeyword", token(&v.extends_keyword)),
                ("baseClass", opt_node(&v.base_class)),
            ],
        ),
        Node::ClassInterfaceClause(v) => wrap(
            "ClassInterfaceClause",
            vec![
                ("implementsKeyword", token(&v.implements_keyword)),
                ("interfaceNameList", opt_node(&v.interface_name_list)),
            ],
        ),
        Node::ClassConstDeclaration(v) => wrap(
            "ClassConstDeclaration",
            vec![
                ("modifiers", tokens(&v.modifiers)),
                ("constKeyword", token(&v.const_keyword)),
                ("constElements", opt_node(&v.const_elements)),
                ("semicolon", token(&v.semicolon)),
            ],
        ),
        Node::ConstDeclaration(v) => wrap(
            "ConstDeclaration",
            vec![
                ("constKeyword", token(&v.const_keyword)),
                ("constElements", opt_node(&v.const_elements)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::ConstElement(v) => wrap(
            "ConstElement",
            vec![
                ("name", token(&v.name)),
                ("equalsToken", token(&v.equals_token)),
                ("assignment", node(&v.assignment)),
            ],
        ),
        Node::PropertyDeclaration(v) => wrap(
            "PropertyDeclaration",
            vec![
                ("modifiers", tokens(&v.modifiers)),
                ("propertyElements", opt_node(&v.property_elements)),
                ("semicolon", token(&v.semicolon)),
            ],
        ),
        Node::MissingMemberDeclaration(v) => wrap(
            "MissingMemberDeclaration",
            vec![("modifiers", tokens(&v.modifiers))],
        ),
        Node::InterfaceDeclaration(v) => wrap(
            "InterfaceDeclaration",
            vec![
                ("interfaceKeyword", token(&v.interface_keyword)),
                ("name", token(&v.name)),
                ("interfaceBaseClause", opt_node(&v.interface_base_clause)),
                ("interfaceMembers", node(&v.interface_members)),
            ],
        ),
        Node::InterfaceMembers(v) => wrap(
            "InterfaceMembers",
            vec![
                ("openBrace", token(&v.open_brace)),
                (
                    "interfaceMemberDeclarations",
                    nodes(&v.interface_member_declarations),
                ),
                ("closeBrace", token(&v.close_brace)),
            ],
        ),
        Node::InterfaceBaseClause(v) => wrap(
            "InterfaceBaseClause",
            vec![
                ("extendsKeyword", token(&v.extends_keyword)),
                ("interfaceNameList", opt_node(&v.interface_name_list)),
            ],
        ),
        Node::TraitDeclaration(v) => wrap(
            "TraitDeclaration",
            vec![
                ("traitKeyword", token(&v.trait_keyword)),
                ("name", token(&v.name)),
                ("traitMembers", node(&v.trait_members)),
            ],
        ),
        Node::TraitMembers(v) => wrap(
            "TraitMembers",
            vec![
                ("openBrace", token(&v.open_brace)),
                (
                    "traitMemberDeclarations",
                    nodes(&v.trait_member_declarations),
                ),
                ("closeBrace", token(&v.close_brace)),
            ],
        ),
        Node::TraitUseClause(v) => wrap(
            "TraitUseClause",
            vec![
                ("useKeyword", token(&v.use_keyword)),
                ("traitNameList", opt_node(&v.trait_name_list)),
                ("semicolonOrOpenBrace", token(&v.semicolon_or_open_brace)),
                (
                    "traitSelectAndAliasClauses",
                    opt_node(&v.trait_select_and_alias_clauses),
                ),
                ("closeBrace", opt_token(&v.close_brace)),
            ],
        ),
        Node::TraitSelectOrAliasClause(v) => wrap(
            "TraitSelectOrAliasClause",
            vec![
                ("name", opt_node(&v.name)),
                (
                    "asOrInsteadOfKeyword",
                    token(&v.as_or_instead_of_keyword),
                ),
                ("modifiers", tokens(&v.modifiers)),
                ("targetName", opt_node(&v.target_name)),
            ],
        ),
        Node::NamespaceDefinition(v) => wrap(
            "NamespaceDefinition",
            vec![
                ("namespaceKeyword", token(&v.namespace_keyword)),
                ("name", opt_node(&v.name)),
                (
                    "compoundStatementOrSemicolon",
                    opt_node(&v.compound_statement_or_semicolon),
                ),
            ],
        ),
        Node::NamespaceUseDeclaration(v) => wrap(
            "NamespaceUseDeclaration",
            vec![
                ("useKeyword", token(&v.use_keyword)),
                ("functionOrConst", opt_token(&v.function_or_const)),
                ("useClauses", opt_node(&v.use_clauses)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::NamespaceUseClause(v) => wrap(
            "NamespaceUseClause",
            vec![
                ("namespaceName", opt_node(&v.namespace_name)),
                (
                    "namespaceAliasingClause",
                    opt_node(&v.namespace_aliasing_clause),
                ),
                ("openBrace", opt_token(&v.open_brace)),
                ("groupClauses", opt_node(&v.group_clauses)),
                ("closeBrace", opt_token(&v.close_brace)),
            ],
        ),
        Node::NamespaceUseGroupClause(v) => wrap(
            "NamespaceUseGroupClause",
            vec![
                ("functionOrConst", opt_token(&v.function_or_const)),
                ("namespaceName", opt_node(&v.namespace_name)),
                (
                    "namespaceAliasingClause",
                    opt_node(&v.namespace_aliasing_clause),
                ),
            ],
        ),
        Node::NamespaceAliasingClause(v) => wrap(
            "NamespaceAliasingClause",
            vec![("asKeyword", token(&v.as_keyword)), ("name", token(&v.name))],
        ),
        Node::GlobalDeclaration(v) => wrap(
            "GlobalDeclaration",
            vec![
                ("globalKeyword", token(&v.global_keyword)),
                ("variableNameList", opt_node(&v.variable_name_list)),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::FunctionStaticDeclaration(v) => wrap(
            "FunctionStaticDeclaration",
            vec![
                ("staticKeyword", token(&v.static_keyword)),
                (
                    "staticVariableNameList",
                    opt_node(&v.static_variable_name_list),
                ),
                ("semicolon", opt_token(&v.semicolon)),
            ],
        ),
        Node::StaticVariableDeclaration(v) => wrap(
            "StaticVariableDeclaration",
            vec![
                ("variableName", token(&v.variable_name)),
                ("equalsToken", opt_token(&v.equals_token)),
                ("assignment", opt_node(&v.assignment)),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source_file;

    #[test]
    fn test_token_projection_shape() {
        let file = parse_source_file("<?php $a;", None);
        let value = serialize(&file);
        let root = value.get("SourceFile").expect("root wrapper");
        let eof = root.get("endOfFileToken").expect("eof field");
        assert_eq!(eof.get("kind").unwrap(), "EndOfFileToken");
        assert_eq!(eof.get("length").unwrap(), 0);
        // ignored fields never appear
        assert!(root.get("fileContents").is_none());
        assert!(root.get("uri").is_none());
        assert!(root.get("p").is_none());
    }

    #[test]
    fn test_token_node_collapses_to_token() {
        // the string literal's single child is a token wrapper and must
        // serialize as the bare token object
        let file = parse_source_file("<?php 'x';", None);
        let value = serialize(&file);
        let statements = &value["SourceFile"]["statementList"];
        let string = &statements[1]["ExpressionStatement"]["expression"]["StringLiteral"];
        let children = &string["children"];
        assert!(children.is_object());
        assert_eq!(children["kind"], "StringLiteralToken");
        assert!(string["startQuote"].is_null());
    }

    #[test]
    fn test_single_child_collapse_for_statement_bodies() {
        let file = parse_source_file("<?php if ($a) f(); else { g(); h(); }", None);
        let value = serialize(&file);
        let if_statement = &value["SourceFile"]["statementList"][1]["IfStatement"];
        // one body statement collapses to the object itself
        assert!(if_statement["statements"].is_object());
        assert!(if_statement["statements"]["ExpressionStatement"].is_object());
        // the else body is a compound statement, still a single (collapsed)
        // node whose inner list stays an array
        let else_clause = &if_statement["elseClause"]["ElseClause"];
        let compound = &else_clause["statements"]["CompoundStatement"];
        assert!(compound["statements"].is_array());
        assert_eq!(compound["statements"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_flattened_function_composition() {
        let file = parse_source_file("<?php function f(): int { }", None);
        let value = serialize(&file);
        let function = &value["SourceFile"]["statementList"][1]["FunctionDeclaration"];
        // header, return type and body fields all appear at the same level
        assert!(function.get("functionKeyword").is_some());
        assert!(function.get("openParen").is_some());
        assert!(function.get("colonToken").is_some());
        assert!(function.get("returnType").is_some());
        assert!(function.get("compoundStatementOrSemicolon").is_some());
        // and not nested under intermediate keys
        assert!(function.get("header").is_none());
    }

    #[test]
    fn test_missing_and_skipped_wrappers() {
        let file = parse_source_file("<?php if ( ] ;", None);
        let value = serialize(&file);
        let text = value.to_string();
        assert!(text.contains("MissingNode"));
        assert!(text.contains("SkippedNode"));
    }

    #[test]
    fn test_pretty_print_uses_four_spaces() {
        let file = parse_source_file("<?php $a;", None);
        let bytes = pretty_print(&serialize(&file));
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n    \"SourceFile\""));
        assert!(text.contains("\n        "));
    }

    #[test]
    fn test_absent_optionals_are_null() {
        let file = parse_source_file("<?php class A { }", None);
        let value = serialize(&file);
        let class = &value["SourceFile"]["statementList"][1]["ClassDeclaration"];
        assert!(class["abstractOrFinalModifier"].is_null());
        assert!(class["classBaseClause"].is_null());
        assert!(class["classInterfaceClause"].is_null());
    }
}
