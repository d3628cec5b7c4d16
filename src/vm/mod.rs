//! Textual instruction set of the target stack machine.
//!
//! Instructions are modeled as plain enums; their `Display` impls produce the
//! exact line the downstream translator expects.
use std::fmt::Display;
use std::io::{self, Write};

/// The eight memory segments addressable by `push` and `pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(Segment, u16),
    Pop(Segment, u16),
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    Label(String),
    Goto(String),
    IfGoto(String),
    Call(String, u16),
    Function(String, u16),
    Return,
}

impl Command {
    /// The command a binary operator symbol lowers to, if it is one.
    pub fn binary_operation(symbol: char) -> Option<Command> {
        let command = match symbol {
            '+' => Command::Add,
            '-' => Command::Sub,
            '*' => Command::Call("Math.multiply".to_owned(), 2),
            '/' => Command::Call("Math.divide".to_owned(), 2),
            '&' => Command::And,
            '|' => Command::Or,
            '<' => Command::Lt,
            '>' => Command::Gt,
            '=' => Command::Eq,
            _ => return None,
        };

        Some(command)
    }

    /// The command a unary operator symbol lowers to, if it is one.
    pub fn unary_operation(symbol: char) -> Option<Command> {
        match symbol {
            '-' => Some(Command::Neg),
            '~' => Some(Command::Not),
            _ => None,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Command::Push(segment, index) => format!("push {segment} {index}"),
            Command::Pop(segment, index) => format!("pop {segment} {index}"),
            Command::Add => "add".to_string(),
            Command::Sub => "sub".to_string(),
            Command::Neg => "neg".to_string(),
            Command::Eq => "eq".to_string(),
            Command::Gt => "gt".to_string(),
            Command::Lt => "lt".to_string(),
            Command::And => "and".to_string(),
            Command::Or => "or".to_string(),
            Command::Not => "not".to_string(),
            Command::Label(name) => format!("label {name}"),
            Command::Goto(name) => format!("goto {name}"),
            Command::IfGoto(name) => format!("if-goto {name}"),
            Command::Call(name, args) => format!("call {name} {args}"),
            Command::Function(name, locals) => format!("function {name} {locals}"),
            Command::Return => "return".to_string(),
        };
        f.write_str(&value)
    }
}

/// Serializes commands to the output sink, one instruction per line.
#[derive(Debug)]
pub struct VmWriter<W: Write> {
    sink: W,
}

impl<W: Write> VmWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn emit(&mut self, command: Command) -> io::Result<()> {
        writeln!(self.sink, "{command}")
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_formatting() {
        assert_eq!("push constant 7", Command::Push(Segment::Constant, 7).to_string());
        assert_eq!("pop that 0", Command::Pop(Segment::That, 0).to_string());
        assert_eq!("if-goto WHILE.END1", Command::IfGoto("WHILE.END1".into()).to_string());
        assert_eq!("call Math.divide 2", Command::Call("Math.divide".into(), 2).to_string());
        assert_eq!("function Main.main 0", Command::Function("Main.main".into(), 0).to_string());
        assert_eq!("return", Command::Return.to_string());
    }

    #[test]
    fn test_binary_operation_mapping() {
        assert_eq!(Some(Command::Add), Command::binary_operation('+'));
        assert_eq!(Some(Command::Lt), Command::binary_operation('<'));
        assert_eq!(
            Some(Command::Call("Math.multiply".into(), 2)),
            Command::binary_operation('*')
        );
        assert_eq!(None, Command::binary_operation('~'));
    }

    #[test]
    fn test_unary_operation_mapping() {
        assert_eq!(Some(Command::Neg), Command::unary_operation('-'));
        assert_eq!(Some(Command::Not), Command::unary_operation('~'));
        assert_eq!(None, Command::unary_operation('+'));
    }

    #[test]
    fn test_writer_emits_one_line_per_command() {
        let mut writer = VmWriter::new(Vec::new());

        writer.emit(Command::Push(Segment::Local, 0)).unwrap();
        writer.emit(Command::Return).unwrap();

        let written = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!("push local 0\nreturn\n", written);
    }
}
