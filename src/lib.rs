pub mod cli;
pub mod compiler;
pub mod lexer;
pub mod vm;

pub use cli::Cli;

use std::{error::Error, fs, path::Path};

use log::info;

use crate::{
    compiler::Compiler,
    lexer::{Lexer, Tokens},
};

/// Compile a single class, given as source text, into its VM listing.
pub fn compile_source(source: &str) -> Result<String, Box<dyn Error>> {
    let tokens = Lexer::new(source).lex()?;

    let sink = Compiler::new(Tokens::from(tokens), Vec::new()).compile_class()?;

    Ok(String::from_utf8(sink)?)
}

/// Render the token stream of `source` as one `<category>lexeme</category>`
/// line per token.
pub fn dump_tokens(source: &str) -> Result<String, Box<dyn Error>> {
    let tokens = Lexer::new(source).lex()?;

    let mut listing = String::new();

    for token in &tokens {
        let category = token.category();
        listing.push_str(&format!("<{category}>{}</{category}>\n", token.lexeme()));
    }

    Ok(listing)
}

/// Run the compiler over the path given on the command line: a single
/// `.jack` file, or every `.jack` file directly inside a directory.
pub fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let path = &args.path;

    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let path = entry?.path();

            if path.extension().is_some_and(|extension| extension == "jack") {
                compile_jack_file(&path, args.dump_tokens)?;
            }
        }

        Ok(())
    } else if path.is_file() {
        if path.extension().is_some_and(|extension| extension == "jack") {
            compile_jack_file(path, args.dump_tokens)
        } else {
            Err(format!("'{}' is not a .jack file", path.display()).into())
        }
    } else {
        Err(format!("'{}' is not a valid file or directory", path.display()).into())
    }
}

/// Compile one source file into a sibling `.vm` file. The output file is
/// only written once the whole class compiled.
fn compile_jack_file(path: &Path, dump_tokens_too: bool) -> Result<(), Box<dyn Error>> {
    info!("Compiling '{}'...", path.display());

    let source =
        fs::read_to_string(path).map_err(|error| format!("{}: {error}", path.display()))?;

    if dump_tokens_too {
        let listing = dump_tokens(&source).map_err(|error| format!("{}: {error}", path.display()))?;
        let target = path.with_extension("xml");
        fs::write(&target, listing).map_err(|error| format!("{}: {error}", target.display()))?;
    }

    let vm_text = compile_source(&source).map_err(|error| format!("{}: {error}", path.display()))?;

    let target = path.with_extension("vm");
    fs::write(&target, vm_text).map_err(|error| format!("{}: {error}", target.display()))?;

    Ok(())
}
