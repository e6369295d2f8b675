//! The PHP scanner.
//!
//! A single-threaded state machine over the source bytes. Two top-level
//! modes (HTML passthrough and script), a parsed-tag flag so a literal
//! `<?php` inside script body lexes as plain operators, and re-entrant
//! sub-scans for template strings, heredocs and `{$...}` / `${...}`
//! interpolation. Whitespace and comments are never emitted: the scanner
//! advances past them, and the `full_start`/`start` split attaches them to
//! the following token as leading trivia.
//!
//! The scanner never fails. Unclassifiable bytes become `Unknown` tokens,
//! malformed numbers become `Invalid*` literal kinds, and unterminated
//! strings produce their partial token sequence so the parser can recover.

use crate::tables;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before any open tag, or after `?>`.
    HtmlSection,
    /// An open tag has been seen but not yet emitted.
    ScriptSection,
    /// The open tag has been emitted; a second `<?php` is ordinary tokens.
    ScriptSectionParsed,
}

/// Which template body is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeredocKind {
    /// Interpolating (`<<<ID` or `<<<"ID"`).
    Normal,
    /// Literal (`<<<'ID'`).
    NowDoc,
}

pub struct Lexer<'src> {
    source: &'src str,
    src: &'src [u8],
    pos: usize,
    eof_pos: usize,
    full_start: usize,
    start: usize,
    state: State,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            src: source.as_bytes(),
            pos: 0,
            eof_pos: source.len(),
            full_start: 0,
            start: 0,
            state: State::HtmlSection,
        }
    }

    // ── byte helpers ────────────────────────────────────────────────────

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.src.get(pos).copied()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..)?.chars().next()
    }

    fn is_name_start(&self, pos: usize) -> bool {
        match self.byte_at(pos) {
            Some(b) if b.is_ascii() => b.is_ascii_alphabetic() || b == b'_',
            Some(_) => self.char_at(pos).is_some_and(char::is_alphabetic),
            None => false,
        }
    }

    fn is_name_char(&self, pos: usize) -> bool {
        match self.byte_at(pos) {
            Some(b) if b.is_ascii() => b.is_ascii_alphanumeric() || b == b'_',
            Some(_) => self.char_at(pos).is_some_and(char::is_alphabetic),
            None => false,
        }
    }

    /// Advances past one name: a name-start followed by name characters.
    fn scan_name(&mut self) {
        while self.pos < self.eof_pos {
            let b = self.src[self.pos];
            if b.is_ascii() {
                if b.is_ascii_alphanumeric() || b == b'_' {
                    self.pos += 1;
                    continue;
                }
                return;
            }
            match self.char_at(self.pos) {
                Some(c) if c.is_alphabetic() => self.pos += c.len_utf8(),
                _ => return,
            }
        }
    }

    fn create_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.full_start, self.start, self.pos - self.full_start)
    }

    /// A token with no leading trivia covering `from..to`.
    fn plain_token(kind: TokenKind, from: usize, to: usize) -> Token {
        Token::new(kind, from, from, to - from)
    }

    // ── main dispatch ───────────────────────────────────────────────────

    /// Scans forward and appends at least one token to `out`. Template
    /// strings and heredocs append their whole sub-token sequence.
    fn scan(&mut self, out: &mut Vec<Token>) {
        self.full_start = self.pos;

        loop {
            self.start = self.pos;

            if self.pos >= self.eof_pos {
                if self.state == State::HtmlSection {
                    self.state = State::ScriptSection;
                    if self.pos > self.full_start {
                        out.push(Token::new(
                            TokenKind::InlineHtml,
                            self.full_start,
                            self.full_start,
                            self.pos - self.full_start,
                        ));
                        return;
                    }
                    continue;
                }
                out.push(self.create_token(TokenKind::EndOfFileToken));
                return;
            }

            if self.state == State::HtmlSection {
                if !self.is_script_start_tag(self.pos) {
                    self.pos += 1;
                    continue;
                }
                self.state = State::ScriptSection;
                if self.pos == self.full_start {
                    continue;
                }
                out.push(Token::new(
                    TokenKind::InlineHtml,
                    self.full_start,
                    self.full_start,
                    self.pos - self.full_start,
                ));
                return;
            }

            match self.src[self.pos] {
                b'#' => {
                    self.scan_single_line_comment();
                    continue;
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                    continue;
                }
                b'/' => {
                    if self.byte_at(self.pos + 1) == Some(b'/') {
                        self.scan_single_line_comment();
                        continue;
                    }
                    if self.byte_at(self.pos + 1) == Some(b'*') {
                        self.scan_delimited_comment();
                        continue;
                    }
                    if self.byte_at(self.pos + 1) == Some(b'=') {
                        self.pos += 2;
                        out.push(self.create_token(TokenKind::SlashEqualsToken));
                        return;
                    }
                    self.pos += 1;
                    out.push(self.create_token(TokenKind::SlashToken));
                    return;
                }
                b'$' => {
                    self.pos += 1;
                    if self.is_name_start(self.pos) {
                        self.scan_name();
                        out.push(self.create_token(TokenKind::VariableName));
                    } else {
                        out.push(self.create_token(TokenKind::DollarToken));
                    }
                    return;
                }
                b'"' => {
                    self.scan_template_string(out, b'"');
                    return;
                }
                b'`' => {
                    self.scan_template_string(out, b'`');
                    return;
                }
                b'\'' => {
                    out.push(self.scan_single_quote_string());
                    return;
                }
                b'b' | b'B' if matches!(self.byte_at(self.pos + 1), Some(b'\'') | Some(b'"')) => {
                    // binary-string prefix: the b is part of the token
                    self.pos += 1;
                    if self.src[self.pos] == b'\'' {
                        out.push(self.scan_single_quote_string());
                    } else {
                        self.scan_template_string(out, b'"');
                    }
                    return;
                }
                b'<' if self.looks_like_heredoc_start() => {
                    if self.try_scan_heredoc(out) {
                        return;
                    }
                    self.scan_operator_or_punctuator(out);
                    return;
                }
                b'(' => {
                    if let Some(token) = self.try_scan_cast_token() {
                        out.push(token);
                        return;
                    }
                    self.scan_operator_or_punctuator(out);
                    return;
                }
                b'.' if self.byte_at(self.pos + 1).is_some_and(|b| b.is_ascii_digit()) => {
                    let kind = self.scan_numeric_literal();
                    out.push(self.create_token(kind));
                    return;
                }
                b'<' | b'.' | b'=' | b'>' | b'*' | b'!' | b'+' | b'-' | b'%' | b'^' | b'|'
                | b'&' | b'?' | b':' | b',' | b'@' | b'[' | b']' | b')' | b'{' | b'}' | b';'
                | b'~' | b'\\' => {
                    self.scan_operator_or_punctuator(out);
                    return;
                }
                _ => {
                    self.scan_name_or_digits(out);
                    return;
                }
            }
        }
    }

    // ── trivia ──────────────────────────────────────────────────────────

    fn scan_single_line_comment(&mut self) {
        while self.pos < self.eof_pos {
            let b = self.src[self.pos];
            if b == b'\n' || b == b'\r' {
                return;
            }
            // ?> terminates the comment as well as the statement
            if b == b'?' && self.byte_at(self.pos + 1) == Some(b'>') {
                return;
            }
            self.pos += 1;
        }
    }

    fn scan_delimited_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.eof_pos {
            if self.src[self.pos] == b'*' && self.byte_at(self.pos + 1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
        // unterminated comment runs to end of input
    }

    // ── script start tag (HTML mode) ────────────────────────────────────

    fn is_script_start_tag(&self, pos: usize) -> bool {
        if self.byte_at(pos) != Some(b'<') {
            return false;
        }
        if pos + 5 < self.eof_pos
            && self.src[pos..pos + 5].eq_ignore_ascii_case(b"<?php")
            && matches!(self.src[pos + 5], b' ' | b'\t' | b'\n' | b'\r')
        {
            return true;
        }
        pos + 3 <= self.eof_pos && &self.src[pos..pos + 3] == b"<?="
    }

    // ── operators ───────────────────────────────────────────────────────

    /// Greedy longest-match over the operator table, lengths 7 down to 1.
    /// Bytes no entry matches become `Unknown`.
    fn scan_operator_or_punctuator(&mut self, out: &mut Vec<Token>) {
        let mut buf = [0u8; tables::MAX_OPERATOR_LENGTH];
        let avail = (self.eof_pos - self.pos).min(tables::MAX_OPERATOR_LENGTH);
        for len in (1..=avail).rev() {
            let window = &mut buf[..len];
            window.copy_from_slice(&self.src[self.pos..self.pos + len]);
            window.make_ascii_lowercase();
            let Some(kind) = tables::lookup_operator_or_punctuator(window) else {
                continue;
            };
            if kind == TokenKind::ScriptSectionStartTag {
                if self.state == State::ScriptSectionParsed {
                    // a literal <?php inside script body is not a tag
                    continue;
                }
                self.state = State::ScriptSectionParsed;
            }
            self.pos += len;
            if kind == TokenKind::ScriptSectionEndTag {
                self.state = State::HtmlSection;
            }
            out.push(self.create_token(kind));
            return;
        }
        self.pos += 1;
        out.push(self.create_token(TokenKind::Unknown));
    }

    // ── names, keywords, numbers ────────────────────────────────────────

    fn scan_name_or_digits(&mut self, out: &mut Vec<Token>) {
        if self.is_name_start(self.pos) {
            self.scan_name();
            let mut token = self.create_token(TokenKind::Name);
            let text = &self.src[self.start..self.pos];
            if let Some(kind) = lookup_keyword_or_reserved(text) {
                token.kind = kind;
                if kind == TokenKind::YieldKeyword {
                    if let Some(end) = self.try_scan_yield_from() {
                        token.kind = TokenKind::YieldFromKeyword;
                        token.length = end - token.full_start;
                    }
                }
            }
            out.push(token);
            return;
        }
        if self.src[self.pos].is_ascii_digit() {
            let kind = self.scan_numeric_literal();
            out.push(self.create_token(kind));
            return;
        }
        // advance one whole code point so the next scan starts on a boundary
        let width = self.char_at(self.pos).map_or(1, char::len_utf8);
        self.pos += width;
        out.push(self.create_token(TokenKind::Unknown));
    }

    /// After a `yield` name: if the next word (skipping whitespace) is
    /// `from`, extend the token over it.
    fn try_scan_yield_from(&mut self) -> Option<usize> {
        let mut p = self.pos;
        while matches!(self.byte_at(p), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            p += 1;
        }
        if p + 4 <= self.eof_pos
            && self.src[p..p + 4].eq_ignore_ascii_case(b"from")
            && !self.is_name_char(p + 4)
        {
            self.pos = p + 4;
            return Some(self.pos);
        }
        None
    }

    fn scan_numeric_literal(&mut self) -> TokenKind {
        if self.byte_at(self.pos) == Some(b'0')
            && matches!(self.byte_at(self.pos + 1), Some(b'b') | Some(b'B'))
        {
            self.pos += 2;
            let digits_start = self.pos;
            let valid = self.scan_binary_digits();
            if self.pos == digits_start || !valid {
                return TokenKind::InvalidBinaryLiteral;
            }
            return TokenKind::BinaryLiteralToken;
        }
        if self.byte_at(self.pos) == Some(b'0')
            && matches!(self.byte_at(self.pos + 1), Some(b'x') | Some(b'X'))
        {
            self.pos += 2;
            let digits_start = self.pos;
            let valid = self.scan_hexadecimal_digits();
            if self.pos == digits_start || !valid {
                return TokenKind::InvalidHexadecimalLiteral;
            }
            return TokenKind::HexadecimalLiteralToken;
        }

        let literal_start = self.pos;
        if self.scan_floating_literal() {
            return TokenKind::FloatingLiteralToken;
        }
        self.pos = literal_start;

        if self.src[self.pos] == b'0' {
            let valid = self.scan_octal_digits();
            if self.pos == literal_start + 1 {
                // a lone 0 is a decimal literal
                return TokenKind::IntegerLiteralToken;
            }
            if !valid {
                return TokenKind::InvalidOctalLiteralToken;
            }
            return TokenKind::OctalLiteralToken;
        }

        while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        TokenKind::IntegerLiteralToken
    }

    fn scan_binary_digits(&mut self) -> bool {
        let mut valid = true;
        while let Some(b) = self.byte_at(self.pos) {
            match b {
                b'0' | b'1' => self.pos += 1,
                b'2'..=b'9' => {
                    self.pos += 1;
                    valid = false;
                }
                _ => break,
            }
        }
        valid
    }

    fn scan_hexadecimal_digits(&mut self) -> bool {
        let mut valid = true;
        while self.pos < self.eof_pos {
            let b = self.src[self.pos];
            if b.is_ascii_hexdigit() {
                self.pos += 1;
            } else if b.is_ascii_alphanumeric() || b == b'_' {
                // stray name characters poison the literal but stay inside it
                self.pos += 1;
                valid = false;
            } else {
                break;
            }
        }
        valid
    }

    fn scan_octal_digits(&mut self) -> bool {
        let mut valid = true;
        while let Some(b) = self.byte_at(self.pos) {
            match b {
                b'0'..=b'7' => self.pos += 1,
                b'8' | b'9' => {
                    self.pos += 1;
                    valid = false;
                }
                _ => break,
            }
        }
        valid
    }

    /// Returns true when a floating-point literal was consumed; otherwise
    /// the caller must reset `pos` and rescan as an integer form.
    fn scan_floating_literal(&mut self) -> bool {
        let mut has_dot = false;
        let mut exp_start: Option<usize> = None;
        let mut has_sign = false;

        while self.pos < self.eof_pos {
            let b = self.src[self.pos];
            if b.is_ascii_digit() {
                self.pos += 1;
            } else if b == b'.' {
                if has_dot || exp_start.is_some() {
                    break;
                }
                has_dot = true;
                self.pos += 1;
            } else if b == b'e' || b == b'E' {
                if exp_start.is_some() {
                    break;
                }
                exp_start = Some(self.pos);
                self.pos += 1;
            } else if b == b'+' || b == b'-' {
                if exp_start == Some(self.pos - 1) {
                    has_sign = true;
                    self.pos += 1;
                } else {
                    break;
                }
            } else {
                break;
            }
        }

        if let Some(exp) = exp_start {
            let expected_min = if has_sign { exp + 3 } else { exp + 2 };
            if self.pos >= expected_min {
                return true;
            }
            // no digits after the exponent marker; back out of it
            self.pos = exp;
        }
        has_dot
    }

    // ── casts ───────────────────────────────────────────────────────────

    /// `( int )`-style cast detection. Matches `(`, optional blanks, a cast
    /// keyword, optional blanks, `)`; anything else stays a plain paren.
    fn try_scan_cast_token(&mut self) -> Option<Token> {
        let mut p = self.pos + 1;
        while matches!(self.byte_at(p), Some(b' ' | b'\t')) {
            p += 1;
        }
        for (keyword, kind) in tables::CAST_KEYWORDS {
            if p + keyword.len() > self.eof_pos {
                continue;
            }
            if !self.src[p..p + keyword.len()].eq_ignore_ascii_case(keyword) {
                continue;
            }
            let mut q = p + keyword.len();
            while matches!(self.byte_at(q), Some(b' ' | b'\t')) {
                q += 1;
            }
            if self.byte_at(q) == Some(b')') {
                self.pos = q + 1;
                return Some(self.create_token(kind));
            }
        }
        None
    }

    // ── single-quoted strings ───────────────────────────────────────────

    /// Only `\'` and `\\` escape; any other backslash is literal. An
    /// unterminated string is downgraded to `EncapsedAndWhitespace`.
    fn scan_single_quote_string(&mut self) -> Token {
        self.pos += 1;
        while self.pos < self.eof_pos {
            let b = self.src[self.pos];
            if b == b'\\' && matches!(self.byte_at(self.pos + 1), Some(b'\'') | Some(b'\\')) {
                self.pos += 2;
            } else if b == b'\'' {
                self.pos += 1;
                return self.create_token(TokenKind::StringLiteralToken);
            } else {
                self.pos += 1;
            }
        }
        self.create_token(TokenKind::EncapsedAndWhitespace)
    }

    // ── template strings ────────────────────────────────────────────────

    /// Double-quoted and backtick strings. A double-quoted string with no
    /// interpolation collapses to one `StringLiteralToken`; otherwise the
    /// output is open quote, parts, close quote.
    fn scan_template_string(&mut self, out: &mut Vec<Token>, quote: u8) {
        let quote_pos = self.pos;
        let quote_kind = if quote == b'`' {
            TokenKind::BacktickToken
        } else {
            TokenKind::DoubleQuoteToken
        };
        // backtick strings always use the sequence form
        let mut opened = quote == b'`';
        self.pos += 1;
        if opened {
            out.push(Token::new(
                quote_kind,
                self.full_start,
                self.start,
                self.pos - self.full_start,
            ));
        }
        let mut run_start = self.pos;

        macro_rules! open_and_flush {
            () => {
                if !opened {
                    out.push(Token::new(
                        quote_kind,
                        self.full_start,
                        self.start,
                        quote_pos + 1 - self.full_start,
                    ));
                    opened = true;
                }
                if self.pos > run_start {
                    out.push(Self::plain_token(
                        TokenKind::EncapsedAndWhitespace,
                        run_start,
                        self.pos,
                    ));
                }
            };
        }

        loop {
            if self.pos >= self.eof_pos {
                // unterminated: flush what we have and stop
                open_and_flush!();
                return;
            }
            let b = self.src[self.pos];

            if b == quote {
                if !opened {
                    self.pos += 1;
                    out.push(self.create_token(TokenKind::StringLiteralToken));
                    return;
                }
                open_and_flush!();
                self.pos += 1;
                out.push(Self::plain_token(quote_kind, self.pos - 1, self.pos));
                return;
            }

            if b == b'$' && self.is_name_start(self.pos + 1) {
                open_and_flush!();
                self.scan_template_variable(out);
                run_start = self.pos;
                continue;
            }

            if b == b'$' && self.byte_at(self.pos + 1) == Some(b'{') {
                open_and_flush!();
                if self.scan_curly_expression(out, TokenKind::DollarOpenBraceToken) {
                    return;
                }
                run_start = self.pos;
                continue;
            }

            if b == b'{' && self.byte_at(self.pos + 1) == Some(b'$') {
                open_and_flush!();
                if self.scan_curly_expression(out, TokenKind::OpenBraceDollarToken) {
                    return;
                }
                run_start = self.pos;
                continue;
            }

            if b == b'\\' {
                self.pos += 1;
                self.scan_dq_escape_sequence();
                continue;
            }

            self.pos += 1;
        }
    }

    /// `$name` inside a template, with the single-level `[index]` and
    /// `->name` dereference forms.
    fn scan_template_variable(&mut self, out: &mut Vec<Token>) {
        let var_start = self.pos;
        self.pos += 1;
        self.scan_name();
        out.push(Self::plain_token(TokenKind::VariableName, var_start, self.pos));

        if self.byte_at(self.pos) == Some(b'[') {
            self.pos += 1;
            out.push(Self::plain_token(TokenKind::OpenBracketToken, self.pos - 1, self.pos));
            if self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                let from = self.pos;
                while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                out.push(Self::plain_token(TokenKind::IntegerLiteralToken, from, self.pos));
            } else if self.is_name_start(self.pos) {
                let from = self.pos;
                self.scan_name();
                out.push(Self::plain_token(TokenKind::Name, from, self.pos));
            }
            if self.byte_at(self.pos) == Some(b']') {
                self.pos += 1;
                out.push(Self::plain_token(TokenKind::CloseBracketToken, self.pos - 1, self.pos));
            }
        } else if self.byte_at(self.pos) == Some(b'-')
            && self.byte_at(self.pos + 1) == Some(b'>')
            && self.is_name_start(self.pos + 2)
        {
            self.pos += 2;
            out.push(Self::plain_token(TokenKind::ArrowToken, self.pos - 2, self.pos));
            let from = self.pos;
            self.scan_name();
            out.push(Self::plain_token(TokenKind::Name, from, self.pos));
        }
    }

    /// `${...}` / `{$...}` inside a template: emit the opener, then re-enter
    /// the main scan until the matching close brace. Returns true when the
    /// enclosing template scan must abort (a `?>` was scanned).
    fn scan_curly_expression(&mut self, out: &mut Vec<Token>, open_kind: TokenKind) -> bool {
        // {$ keeps its $ for the re-scan; ${ consumes both bytes
        let open_len = if open_kind == TokenKind::DollarOpenBraceToken {
            2
        } else {
            1
        };
        out.push(Self::plain_token(open_kind, self.pos, self.pos + open_len));
        self.pos += open_len;

        let mut first = open_kind == TokenKind::DollarOpenBraceToken;
        while self.pos < self.eof_pos {
            let before = out.len();
            self.scan(out);
            if first {
                // ${name} names the variable without its $
                if let Some(token) = out.get_mut(before) {
                    if tables::is_name_or_keyword_or_reserved(token.kind) {
                        token.kind = TokenKind::StringVarname;
                    }
                }
                first = false;
            }
            if out.len() == before + 1 {
                match out[before].kind {
                    TokenKind::CloseBraceToken => return false,
                    TokenKind::ScriptSectionEndTag => return true,
                    TokenKind::EndOfFileToken => {
                        // keep the EOF for the stream tail
                        return true;
                    }
                    _ => {}
                }
            }
        }
        false
    }

    fn scan_dq_escape_sequence(&mut self) {
        let Some(b) = self.byte_at(self.pos) else {
            return;
        };
        match b {
            b'x' | b'X' => {
                self.pos += 1;
                for _ in 0..2 {
                    if self.byte_at(self.pos).is_some_and(|b| b.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                }
            }
            b'u' => {
                self.pos += 1;
                if self.byte_at(self.pos) == Some(b'{') {
                    self.pos += 1;
                    while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    if self.byte_at(self.pos) == Some(b'}') {
                        self.pos += 1;
                    }
                }
            }
            b'0'..=b'7' => {
                for _ in 0..3 {
                    if self.byte_at(self.pos).is_some_and(|b| (b'0'..=b'7').contains(&b)) {
                        self.pos += 1;
                    }
                }
            }
            _ => {
                // simple escapes and unknown escapes both consume one byte
                self.pos += 1;
            }
        }
    }

    // ── heredoc / nowdoc ────────────────────────────────────────────────

    fn looks_like_heredoc_start(&self) -> bool {
        self.byte_at(self.pos + 1) == Some(b'<') && self.byte_at(self.pos + 2) == Some(b'<')
    }

    /// `<<<`, optional blanks, optionally quoted identifier, newline.
    /// On a match, emits `HeredocStart`, the body tokens and `HeredocEnd`
    /// and returns true. On no match leaves `pos` untouched.
    fn try_scan_heredoc(&mut self, out: &mut Vec<Token>) -> bool {
        let mut p = self.pos + 3;
        while matches!(self.byte_at(p), Some(b' ' | b'\t')) {
            p += 1;
        }
        let quote = match self.byte_at(p) {
            Some(q @ (b'\'' | b'"')) => {
                p += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.is_name_start(p) {
            return false;
        }
        let ident_start = p;
        while p < self.eof_pos && self.is_name_char(p) {
            p += 1;
        }
        let ident_end = p;
        if let Some(q) = quote {
            if self.byte_at(p) != Some(q) {
                return false;
            }
            p += 1;
        }
        match self.byte_at(p) {
            Some(b'\r') => {
                p += 1;
                if self.byte_at(p) == Some(b'\n') {
                    p += 1;
                }
            }
            Some(b'\n') => p += 1,
            _ => return false,
        }

        let src = self.src;
        let ident = &src[ident_start..ident_end];
        let kind = if quote == Some(b'\'') {
            HeredocKind::NowDoc
        } else {
            HeredocKind::Normal
        };
        self.pos = p;
        out.push(self.create_token(TokenKind::HeredocStart));
        self.scan_heredoc_body(out, ident, kind);
        true
    }

    /// If a closing marker begins at `line_start` (optional indent, the
    /// identifier, then a non-name byte), returns the marker's end offset.
    fn check_heredoc_end(&self, line_start: usize, ident: &[u8]) -> Option<usize> {
        let mut p = line_start;
        while matches!(self.byte_at(p), Some(b' ' | b'\t')) {
            p += 1;
        }
        if p + ident.len() > self.eof_pos || &self.src[p..p + ident.len()] != ident {
            return None;
        }
        if self.is_name_char(p + ident.len()) {
            return None;
        }
        Some(p + ident.len())
    }

    fn scan_heredoc_body(&mut self, out: &mut Vec<Token>, ident: &[u8], kind: HeredocKind) {
        // the body may close on its very first line
        if let Some(end) = self.check_heredoc_end(self.pos, ident) {
            out.push(Self::plain_token(TokenKind::HeredocEnd, self.pos, end));
            self.pos = end;
            return;
        }

        let mut run_start = self.pos;
        macro_rules! flush {
            () => {
                if self.pos > run_start {
                    out.push(Self::plain_token(
                        TokenKind::EncapsedAndWhitespace,
                        run_start,
                        self.pos,
                    ));
                }
            };
        }

        loop {
            if self.pos >= self.eof_pos {
                flush!();
                return;
            }
            let b = self.src[self.pos];

            if b == b'\n' || b == b'\r' {
                self.pos += 1;
                if b == b'\r' && self.byte_at(self.pos) == Some(b'\n') {
                    self.pos += 1;
                }
                if let Some(end) = self.check_heredoc_end(self.pos, ident) {
                    flush!();
                    out.push(Self::plain_token(TokenKind::HeredocEnd, self.pos, end));
                    self.pos = end;
                    return;
                }
                continue;
            }

            if kind == HeredocKind::Normal {
                if b == b'$' && self.is_name_start(self.pos + 1) {
                    flush!();
                    self.scan_template_variable(out);
                    run_start = self.pos;
                    continue;
                }
                if b == b'$' && self.byte_at(self.pos + 1) == Some(b'{') {
                    flush!();
                    if self.scan_curly_expression(out, TokenKind::DollarOpenBraceToken) {
                        return;
                    }
                    run_start = self.pos;
                    continue;
                }
                if b == b'{' && self.byte_at(self.pos + 1) == Some(b'$') {
                    flush!();
                    if self.scan_curly_expression(out, TokenKind::OpenBraceDollarToken) {
                        return;
                    }
                    run_start = self.pos;
                    continue;
                }
                if b == b'\\' {
                    self.pos += 1;
                    self.scan_dq_escape_sequence();
                    continue;
                }
            }

            self.pos += 1;
        }
    }
}

/// Keyword/reserved-word promotion for a scanned name. Allocation-free:
/// names longer than any keyword cannot match.
fn lookup_keyword_or_reserved(text: &[u8]) -> Option<TokenKind> {
    const LONGEST: usize = 12; // include_once / require_once
    if text.len() > LONGEST {
        return None;
    }
    let mut lower = [0u8; LONGEST];
    let lower = &mut lower[..text.len()];
    lower.copy_from_slice(text);
    lower.make_ascii_lowercase();
    tables::lookup_keyword(lower).or_else(|| tables::lookup_reserved_word(lower))
}

/// Tokenizes the whole source. The result always ends with a zero-length
/// `EndOfFileToken` and tiles the input exactly.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let before = tokens.len();
        lexer.scan(&mut tokens);
        if tokens[before..]
            .iter()
            .any(|t| t.kind == TokenKind::EndOfFileToken)
        {
            break;
        }
    }
    tokens
}

/// A cursor over a fully tokenized source. Reads past the end keep
/// returning the `EndOfFileToken`.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    eof_pos: usize,
}

impl TokenStream {
    pub fn new(source: &str) -> Self {
        let tokens = tokenize(source);
        let eof_pos = tokens.len() - 1;
        TokenStream {
            tokens,
            pos: 0,
            eof_pos,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Returns the next token and advances, saturating at the EOF token.
    pub fn scan_next(&mut self) -> Token {
        if self.pos >= self.eof_pos {
            return self.tokens[self.eof_pos];
        }
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.eof_pos);
    }

    /// `(kind, fullStart, start, length)` lines for golden-file comparison.
    pub fn debug_tuples(&self) -> Vec<(&'static str, usize, usize, usize)> {
        self.tokens.iter().map(Token::debug_tuple).collect()
    }
}
