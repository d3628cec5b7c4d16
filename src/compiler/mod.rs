//! Compiler for the Jack programming language.
//!
//! A recursive-descent parser whose productions emit VM commands while the
//! parse is running. No syntax tree is built; parsing decisions feed on the
//! symbol table and drive the writer directly.
mod symbols;

pub use self::symbols::*;

use std::{error::Error, fmt::Display, io::Write};

use log::debug;

use crate::{
    lexer::{Keyword, Position, Token, Tokens},
    vm::{Command, Segment, VmWriter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

impl ParseError {
    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit end of input while parsing {item}"),
            position: None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some((line, col)) => write!(f, "{} ({line}:{col})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for ParseError {}

pub type CompileResult<T> = Result<T, Box<dyn Error>>;

/// Compiles a single class into VM commands written to `W`.
pub struct Compiler<W: Write> {
    tokens: Tokens<Token>,
    symbols: SymbolTable,
    writer: VmWriter<W>,
    class_name: String,
    label_count: usize,
}

impl<W: Write> Compiler<W> {
    pub fn new(tokens: Tokens<Token>, sink: W) -> Self {
        Self {
            tokens,
            symbols: SymbolTable::new(),
            writer: VmWriter::new(sink),
            class_name: String::new(),
            label_count: 0,
        }
    }

    /// Compile the one class this token stream must contain and hand back
    /// the output sink.
    pub fn compile_class(mut self) -> CompileResult<W> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;

        debug!("compiling class '{}'", self.class_name);

        self.expect_symbol('{')?;

        while let Some(keyword @ (Keyword::Static | Keyword::Field)) = self.current_keyword() {
            self.compile_class_var_dec(keyword)?;
        }

        while let Some(kind @ (Keyword::Constructor | Keyword::Function | Keyword::Method)) =
            self.current_keyword()
        {
            self.compile_subroutine(kind)?;
        }

        self.expect_symbol('}')?;

        if let Some(token) = self.tokens.current() {
            return Err(ParseError {
                message: format!("expected end of file but got '{}'", token.lexeme()),
                position: Some(token.position()),
            }
            .into());
        }

        Ok(self.writer.into_inner())
    }

    fn compile_class_var_dec(&mut self, keyword: Keyword) -> CompileResult<()> {
        let storage = if keyword == Keyword::Static {
            Storage::Static
        } else {
            Storage::Field
        };
        self.tokens.advance();

        let ty = self.expect_type()?;

        loop {
            let position = self.current_position();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, storage, position)?;

            if self.current_symbol() == Some(',') {
                self.tokens.advance();
            } else {
                break;
            }
        }

        self.expect_symbol(';')?;

        Ok(())
    }

    fn compile_subroutine(&mut self, kind: Keyword) -> CompileResult<()> {
        self.tokens.advance();

        // The return type is parsed but plays no role in code generation;
        // bare `return;` statements push the constant 0 regardless.
        if self.current_keyword() == Some(Keyword::Void) {
            self.tokens.advance();
        } else {
            self.expect_type()?;
        }

        let name = self.expect_identifier()?;

        debug!("compiling subroutine '{}.{name}'", self.class_name);

        self.symbols
            .start_subroutine(kind == Keyword::Method, &self.class_name);

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.current_keyword() == Some(Keyword::Var) {
            self.compile_var_dec()?;
        }

        self.writer.emit(Command::Function(
            format!("{}.{name}", self.class_name),
            self.symbols.count(Storage::Local),
        ))?;

        match kind {
            Keyword::Constructor => {
                self.writer.emit(Command::Push(
                    Segment::Constant,
                    self.symbols.count(Storage::Field),
                ))?;
                self.writer.emit(Command::Call("Memory.alloc".to_owned(), 1))?;
                self.writer.emit(Command::Pop(Segment::Pointer, 0))?;
            }
            Keyword::Method => {
                self.writer.emit(Command::Push(Segment::Argument, 0))?;
                self.writer.emit(Command::Pop(Segment::Pointer, 0))?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;

        Ok(())
    }

    fn compile_parameter_list(&mut self) -> CompileResult<()> {
        if self.current_symbol() == Some(')') {
            return Ok(());
        }

        loop {
            let ty = self.expect_type()?;
            let position = self.current_position();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, Storage::Argument, position)?;

            if self.current_symbol() == Some(',') {
                self.tokens.advance();
            } else {
                break;
            }
        }

        Ok(())
    }

    fn compile_var_dec(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        let ty = self.expect_type()?;

        loop {
            let position = self.current_position();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, Storage::Local, position)?;

            if self.current_symbol() == Some(',') {
                self.tokens.advance();
            } else {
                break;
            }
        }

        self.expect_symbol(';')?;

        Ok(())
    }

    fn compile_statements(&mut self) -> CompileResult<()> {
        while let Some(
            keyword @ (Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return),
        ) = self.current_keyword()
        {
            match keyword {
                Keyword::Let => self.compile_let()?,
                Keyword::If => self.compile_if()?,
                Keyword::While => self.compile_while()?,
                Keyword::Do => self.compile_do()?,
                _ => self.compile_return()?,
            }
        }

        Ok(())
    }

    fn compile_let(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        let position = self.current_position();
        let name = self.expect_identifier()?;
        let (segment, index) = self.resolve(&name, position)?;

        if self.current_symbol() == Some('[') {
            self.writer.emit(Command::Push(segment, index))?;
            self.tokens.advance();
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.emit(Command::Add)?;

            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;

            // Park the value in temp 0 before touching pointer 1, so the
            // right-hand side may itself contain array accesses.
            self.writer.emit(Command::Pop(Segment::Temp, 0))?;
            self.writer.emit(Command::Pop(Segment::Pointer, 1))?;
            self.writer.emit(Command::Push(Segment::Temp, 0))?;
            self.writer.emit(Command::Pop(Segment::That, 0))?;
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;

            self.writer.emit(Command::Pop(segment, index))?;
        }

        Ok(())
    }

    fn compile_if(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        // Both numbers are drawn even when no else branch follows.
        let else_label = format!("IF.ELSE{}", self.fresh_label());
        let end_label = format!("IF.END{}", self.fresh_label());

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.emit(Command::Not)?;
        self.writer.emit(Command::IfGoto(else_label.clone()))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.current_keyword() == Some(Keyword::Else) {
            self.tokens.advance();

            self.writer.emit(Command::Goto(end_label.clone()))?;
            self.writer.emit(Command::Label(else_label))?;

            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;

            self.writer.emit(Command::Label(end_label))?;
        } else {
            self.writer.emit(Command::Label(else_label))?;
        }

        Ok(())
    }

    fn compile_while(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        let exp_label = format!("WHILE.EXP{}", self.fresh_label());
        let end_label = format!("WHILE.END{}", self.fresh_label());

        self.writer.emit(Command::Label(exp_label.clone()))?;

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.emit(Command::Not)?;
        self.writer.emit(Command::IfGoto(end_label.clone()))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.emit(Command::Goto(exp_label))?;
        self.writer.emit(Command::Label(end_label))?;

        Ok(())
    }

    fn compile_do(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        let name = self.expect_identifier()?;
        self.compile_subroutine_call(name)?;
        self.expect_symbol(';')?;

        // discard the call's result
        self.writer.emit(Command::Pop(Segment::Temp, 0))?;

        Ok(())
    }

    fn compile_return(&mut self) -> CompileResult<()> {
        self.tokens.advance();

        if self.current_symbol() == Some(';') {
            self.writer.emit(Command::Push(Segment::Constant, 0))?;
        } else {
            self.compile_expression()?;
        }

        self.expect_symbol(';')?;
        self.writer.emit(Command::Return)?;

        Ok(())
    }

    /// Left fold over terms. Operators associate strictly left to right;
    /// the language has no precedence levels.
    fn compile_expression(&mut self) -> CompileResult<()> {
        self.compile_term()?;

        while let Some(operation) = self.current_symbol().and_then(Command::binary_operation) {
            self.tokens.advance();
            self.compile_term()?;
            self.writer.emit(operation)?;
        }

        Ok(())
    }

    fn compile_term(&mut self) -> CompileResult<()> {
        match self.tokens.current() {
            Some(Token::IntConst { value, .. }) => {
                let value = *value;
                self.tokens.advance();
                self.writer.emit(Command::Push(Segment::Constant, value))?;
            }
            Some(Token::StrConst { value, .. }) => {
                let value = value.clone();
                self.tokens.advance();
                self.compile_string_constant(&value)?;
            }
            Some(Token::Keyword {
                keyword: Keyword::True,
                ..
            }) => {
                self.tokens.advance();
                self.writer.emit(Command::Push(Segment::Constant, 0))?;
                self.writer.emit(Command::Not)?;
            }
            Some(Token::Keyword {
                keyword: Keyword::False | Keyword::Null,
                ..
            }) => {
                self.tokens.advance();
                self.writer.emit(Command::Push(Segment::Constant, 0))?;
            }
            Some(Token::Keyword {
                keyword: Keyword::This,
                ..
            }) => {
                self.tokens.advance();
                self.writer.emit(Command::Push(Segment::Pointer, 0))?;
            }
            Some(Token::Identifier { value, position }) => {
                let name = value.clone();
                let position = *position;
                self.tokens.advance();
                self.compile_term_identifier(name, position)?;
            }
            Some(Token::Symbol { value, .. }) => {
                let symbol = *value;

                if symbol == '(' {
                    self.tokens.advance();
                    self.compile_expression()?;
                    self.expect_symbol(')')?;
                } else if let Some(operation) = Command::unary_operation(symbol) {
                    self.tokens.advance();
                    self.compile_term()?;
                    self.writer.emit(operation)?;
                } else {
                    return Err(self.unexpected("a term").into());
                }
            }
            _ => return Err(self.unexpected("a term").into()),
        }

        Ok(())
    }

    /// An identifier term is an array read, a subroutine call, or a plain
    /// variable read, depending on the token after it.
    fn compile_term_identifier(&mut self, name: String, position: Position) -> CompileResult<()> {
        match self.current_symbol() {
            Some('[') => {
                let (segment, index) = self.resolve(&name, Some(position))?;
                self.writer.emit(Command::Push(segment, index))?;

                self.tokens.advance();
                self.compile_expression()?;
                self.expect_symbol(']')?;

                self.writer.emit(Command::Add)?;
                self.writer.emit(Command::Pop(Segment::Pointer, 1))?;
                self.writer.emit(Command::Push(Segment::That, 0))?;
            }
            Some('(') | Some('.') => self.compile_subroutine_call(name)?,
            _ => {
                let (segment, index) = self.resolve(&name, Some(position))?;
                self.writer.emit(Command::Push(segment, index))?;
            }
        }

        Ok(())
    }

    fn compile_string_constant(&mut self, value: &str) -> CompileResult<()> {
        let length = value.chars().count() as u16;

        self.writer.emit(Command::Push(Segment::Constant, length))?;
        self.writer.emit(Command::Call("String.new".to_owned(), 1))?;

        // String.appendChar leaves the builder on the stack for the next
        // append.
        for c in value.chars() {
            self.writer.emit(Command::Push(Segment::Constant, c as u16))?;
            self.writer
                .emit(Command::Call("String.appendChar".to_owned(), 2))?;
        }

        Ok(())
    }

    /// Compile a call whose leading identifier `first` is already consumed.
    /// `first` is an object variable, a class name, or a subroutine of the
    /// current class; only the symbol table can tell.
    fn compile_subroutine_call(&mut self, first: String) -> CompileResult<()> {
        let (target, mut argument_count) = if self.current_symbol() == Some('.') {
            self.tokens.advance();
            let method = self.expect_identifier()?;

            match self.symbols.get(&first) {
                Some(entry) => {
                    let target = format!("{}.{method}", entry.ty);
                    let receiver = Command::Push(entry.storage.segment(), entry.index);
                    self.writer.emit(receiver)?;
                    (target, 1)
                }
                None => (format!("{first}.{method}"), 0),
            }
        } else {
            self.writer.emit(Command::Push(Segment::Pointer, 0))?;
            (format!("{}.{first}", self.class_name), 1)
        };

        self.expect_symbol('(')?;
        argument_count += self.compile_expression_list()?;
        self.expect_symbol(')')?;

        self.writer.emit(Command::Call(target, argument_count))?;

        Ok(())
    }

    fn compile_expression_list(&mut self) -> CompileResult<u16> {
        let mut count = 0;

        if self.current_symbol() == Some(')') {
            return Ok(count);
        }

        loop {
            self.compile_expression()?;
            count += 1;

            if self.current_symbol() == Some(',') {
                self.tokens.advance();
            } else {
                break;
            }
        }

        Ok(count)
    }

    fn current_keyword(&self) -> Option<Keyword> {
        match self.tokens.current() {
            Some(Token::Keyword { keyword, .. }) => Some(*keyword),
            _ => None,
        }
    }

    fn current_symbol(&self) -> Option<char> {
        match self.tokens.current() {
            Some(Token::Symbol { value, .. }) => Some(*value),
            _ => None,
        }
    }

    fn current_position(&self) -> Option<Position> {
        self.tokens.current().map(Token::position)
    }

    fn fresh_label(&mut self) -> usize {
        let label = self.label_count;
        self.label_count += 1;
        label
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.current() {
            Some(token) => ParseError {
                message: format!("expected {expected} but got '{}'", token.lexeme()),
                position: Some(token.position()),
            },
            None => ParseError::eof(expected),
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), ParseError> {
        match self.tokens.current() {
            Some(Token::Symbol { value, .. }) if *value == symbol => {
                self.tokens.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{symbol}'"))),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        match self.tokens.current() {
            Some(Token::Keyword { keyword: found, .. }) if *found == keyword => {
                self.tokens.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{keyword}'"))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.tokens.current() {
            Some(Token::Identifier { value, .. }) => {
                let value = value.clone();
                self.tokens.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// A type is `int`, `char`, `boolean`, or a class name.
    fn expect_type(&mut self) -> Result<String, ParseError> {
        match self.tokens.current() {
            Some(Token::Keyword {
                keyword: keyword @ (Keyword::Int | Keyword::Char | Keyword::Boolean),
                ..
            }) => {
                let ty = keyword.to_string();
                self.tokens.advance();
                Ok(ty)
            }
            Some(Token::Identifier { value, .. }) => {
                let ty = value.clone();
                self.tokens.advance();
                Ok(ty)
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn define(
        &mut self,
        name: &str,
        ty: &str,
        storage: Storage,
        position: Option<Position>,
    ) -> Result<(), ParseError> {
        if self.symbols.contains_in_scope(name, storage) {
            return Err(ParseError {
                message: format!("redefinition of '{name}'"),
                position,
            });
        }

        self.symbols.define(name, ty, storage);

        Ok(())
    }

    fn resolve(
        &self,
        name: &str,
        position: Option<Position>,
    ) -> Result<(Segment, u16), ParseError> {
        match self.symbols.get(name) {
            Some(entry) => Ok((entry.storage.segment(), entry.index)),
            None => Err(ParseError {
                message: format!("undefined variable '{name}'"),
                position,
            }),
        }
    }
}
