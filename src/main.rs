use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(name = "ocelox", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: OceloxCommand,
}

#[derive(Debug, Subcommand)]
pub enum OceloxCommand {
    /// Dump the token stream of a script.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Dump the syntax tree of a script.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: AstFormat,
    },
    /// Execute a script.
    Run { path: PathBuf },
    /// Read and execute statements interactively, one line at a time.
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum AstFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> ExitCode {
    ocelox_main().expect("Encountered an error!")
}

fn ocelox_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    let args = CLArgs::parse();
    match args.routine {
        OceloxCommand::Tokenize { path, format } => {
            eprintln!("Tokenizing {:?}...", path);
            let src = read_to_string(path)?;
            if !tokenize(&src, &format)? {
                return Ok(ExitCode::from(65));
            }
        }
        OceloxCommand::Parse { path, format } => {
            eprintln!("Parsing {:?}...", path);
            let src = read_to_string(&path)?;
            if !parse(&src, &path, &format)? {
                return Ok(ExitCode::from(65));
            }
        }
        OceloxCommand::Run { path } => {
            eprintln!("Running {:?}...", path);
            let src = read_to_string(&path)?;
            return run(&src, &path);
        }
        OceloxCommand::Repl => {
            repl()?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn tokenize(src: &str, format: &TokenFormat) -> Result<bool> {
    use ocelox::lexer::formatter::{BasicFormatter, DebugFormatter, LineFormatter, TokenFormatter};
    use ocelox::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter::new(src)),
        TokenFormat::Line => Box::new(LineFormatter::new(src)),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return Ok(succeeded);
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
}

fn parse(src: &str, path: &Path, format: &AstFormat) -> Result<bool> {
    use ocelox::lexer::Lexer;
    use ocelox::parser::formatter::{AstFormatter, DebugFormatter, SExpressionFormatter};
    use ocelox::parser::Parser;
    use ocelox::reporter::Reporter;

    let reporter = Reporter::new(src, path);
    let (tokens, errors) = Lexer::new(src).scan();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", reporter.report_lexical_error(error));
        }
        return Ok(false);
    }

    let formatter: Box<dyn AstFormatter> = match format {
        AstFormat::Debug => Box::new(DebugFormatter),
        AstFormat::SExpr => Box::new(SExpressionFormatter),
    };
    match Parser::new(src, tokens).parse() {
        Ok(program) => {
            println!("{}", formatter.format_program(&program));
            Ok(true)
        }
        Err(error) => {
            eprintln!("{}", reporter.report_parse_error(&error));
            Ok(false)
        }
    }
}

fn run(src: &str, path: &Path) -> Result<ExitCode> {
    use ocelox::interpreter::{StdioContext, TreeWalkInterpreter};
    use ocelox::lexer::Lexer;
    use ocelox::parser::Parser;
    use ocelox::reporter::Reporter;
    use ocelox::resolver::Resolver;

    let reporter = Reporter::new(src, path);
    let (tokens, errors) = Lexer::new(src).scan();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", reporter.report_lexical_error(error));
        }
        return Ok(ExitCode::from(65));
    }

    let program = match Parser::new(src, tokens).parse() {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}", reporter.report_parse_error(&error));
            return Ok(ExitCode::from(65));
        }
    };

    let resolved = match Resolver::new().resolve(program) {
        Ok(resolved) => resolved,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", reporter.report_resolution_error(error));
            }
            return Ok(ExitCode::from(65));
        }
    };

    let interpreter = TreeWalkInterpreter::new(StdioContext);
    match interpreter.run(&resolved) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            eprintln!("{}", reporter.report_runtime_error(&error));
            Ok(ExitCode::from(70))
        }
    }
}

fn repl() -> Result<()> {
    use ocelox::interpreter::StdioContext;
    use std::io::Write;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut context = StdioContext;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Err(diagnostics) = ocelox::run(line, &mut context) {
            eprintln!("{diagnostics}");
        }
    }
}
