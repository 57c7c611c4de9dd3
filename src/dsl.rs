//! Command registry and dispatcher.
//!
//! Commands arrive as a flat token list, for example:
//! ```text
//! rows 2 - contains 1 abc toupper 3
//! ```
//!
//! - A command name is followed by its integer parameters, then optionally
//!   one string parameter taken verbatim.
//! - `-` in place of an integer means "the last applicable index".
//! - Commands run as soon as they are parsed, left to right.
//!
//! Command categories and the order they may appear in:
//! - **Layout** (`irow`, `arow`, `drow`, `drows`, `icol`, `acol`, `dcol`,
//!   `dcols`) - may only be followed by more layout commands
//! - **Selection** (`rows`, `beginswith`, `contains`) - may be followed by
//!   more selections or by one data command
//! - **Data** (`cset`, `tolower`, `toupper`, `round`, `int`, `copy`,
//!   `swap`, `move`) - must be the last command

use tracing::debug;

use crate::config::SheetConfig;
use crate::data::{Lower, Round, Truncate, Upper};
use crate::error::{Result, SheetError};
use crate::input::load_table;
use crate::table::{Index, Table};

/// Token standing for "the last applicable index".
pub const LAST_TOKEN: &str = "-";

/// Category of a command, used for ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Layout,
    Data,
    Selection,
}

/// Ordering state: the category of the last command seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Fresh,
    Layout,
    Data,
    Selection,
}

impl Phase {
    /// Can a command of `kind` follow this phase?
    pub fn admits(self, kind: CommandKind) -> bool {
        match self {
            Phase::Fresh => true,
            Phase::Layout => kind == CommandKind::Layout,
            Phase::Data => false,
            Phase::Selection => matches!(kind, CommandKind::Selection | CommandKind::Data),
        }
    }

    /// Phase after running a command of `kind`.
    pub fn after(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Layout => Phase::Layout,
            CommandKind::Data => Phase::Data,
            CommandKind::Selection => Phase::Selection,
        }
    }
}

/// Command implementation, tagged by the shape of its parameters.
#[derive(Clone, Copy)]
pub enum Handler {
    Nullary(fn(&mut Table) -> Result<()>),
    Unary(fn(&mut Table, Index) -> Result<()>),
    Binary(fn(&mut Table, Index, Index) -> Result<()>),
    UnaryText(fn(&mut Table, Index, &str) -> Result<()>),
}

impl Handler {
    /// Number of integer parameters.
    pub fn int_params(&self) -> usize {
        match self {
            Handler::Nullary(_) => 0,
            Handler::Unary(_) | Handler::UnaryText(_) => 1,
            Handler::Binary(_) => 2,
        }
    }

    /// Whether a trailing string parameter follows the integers.
    pub fn takes_text(&self) -> bool {
        matches!(self, Handler::UnaryText(_))
    }
}

/// Registry entry for one command.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("int_params", &self.handler.int_params())
            .field("takes_text", &self.handler.takes_text())
            .finish()
    }
}

/// All known commands, looked up by name.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    /// The full command set.
    pub fn standard() -> Self {
        use CommandKind::{Data, Layout, Selection};
        use Handler::{Binary, Nullary, Unary, UnaryText};

        let spec = |name, kind, handler| CommandSpec {
            name,
            kind,
            handler,
        };

        Self::new(vec![
            spec("irow", Layout, Unary(Table::insert_row)),
            spec("arow", Layout, Nullary(Table::append_row)),
            spec("drow", Layout, Unary(Table::delete_row)),
            spec("drows", Layout, Binary(Table::delete_rows)),
            spec("icol", Layout, Unary(Table::insert_column)),
            spec("acol", Layout, Nullary(Table::append_column)),
            spec("dcol", Layout, Unary(Table::delete_column)),
            spec("dcols", Layout, Binary(Table::delete_columns)),
            spec("cset", Data, UnaryText(Table::set_column)),
            spec("tolower", Data, Unary(|t, col| t.apply_to_selected(col, &Lower))),
            spec("toupper", Data, Unary(|t, col| t.apply_to_selected(col, &Upper))),
            spec("round", Data, Unary(|t, col| t.apply_to_selected(col, &Round))),
            spec("int", Data, Unary(|t, col| t.apply_to_selected(col, &Truncate))),
            spec("copy", Data, Binary(Table::copy_column)),
            spec("swap", Data, Binary(Table::swap_columns)),
            spec("move", Data, Binary(Table::move_column)),
            spec("rows", Selection, Binary(Table::select_rows)),
            spec("beginswith", Selection, UnaryText(Table::select_begins_with)),
            spec("contains", Selection, UnaryText(Table::select_contains)),
        ])
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|spec| spec.name)
    }
}

/// A command with its parameters parsed, ready to run.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub spec: &'a CommandSpec,
    pub args: Vec<Index>,
    pub text: Option<String>,
}

impl Invocation<'_> {
    pub fn run(&self, table: &mut Table) -> Result<()> {
        let missing = || SheetError::Generic("parameters do not match handler");
        let arg = |i: usize| self.args.get(i).copied().ok_or_else(missing);

        match self.spec.handler {
            Handler::Nullary(f) => f(table),
            Handler::Unary(f) => f(table, arg(0)?),
            Handler::Binary(f) => f(table, arg(0)?, arg(1)?),
            Handler::UnaryText(f) => {
                let text = self.text.as_deref().ok_or_else(missing)?;
                f(table, arg(0)?, text)
            }
        }
    }
}

/// Parse an integer parameter: base-10, or `-` for the last index.
pub fn parse_index(token: &str) -> Result<Index> {
    if token == LAST_TOKEN {
        return Ok(Index::Last);
    }
    token
        .parse::<i64>()
        .map(Index::At)
        .map_err(|_| SheetError::BadSyntax(format!("expected a number, got '{token}'")))
}

/// Walks the token list, enforcing order and running each command.
pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
    phase: Phase,
    executed: usize,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self {
            registry,
            phase: Phase::Fresh,
            executed: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Commands run so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Run every command in `tokens` against `table`, stopping at the first error.
    pub fn execute<S: AsRef<str>>(&mut self, table: &mut Table, tokens: &[S]) -> Result<()> {
        if tokens.is_empty() {
            return Err(SheetError::NotFound);
        }

        let mut tokens = tokens.iter().map(S::as_ref);
        while let Some(name) = tokens.next() {
            let invocation = self.next_invocation(name, &mut tokens)?;
            debug!(command = name, args = ?invocation.args, text = ?invocation.text, "running");

            invocation.run(table).inspect_err(|e| {
                debug!(command = name, error = %e, "command failed");
            })?;

            self.phase = Phase::after(invocation.spec.kind);
            self.executed += 1;
        }
        Ok(())
    }

    /// Recognize `name`, check ordering, then consume its parameters.
    fn next_invocation<'t, I>(&self, name: &str, rest: &mut I) -> Result<Invocation<'r>>
    where
        I: Iterator<Item = &'t str>,
    {
        let spec = self
            .registry
            .lookup(name)
            .ok_or_else(|| SheetError::BadSyntax(format!("unknown command '{name}'")))?;

        if !self.phase.admits(spec.kind) {
            return Err(SheetError::BadOrder(format!(
                "'{name}' cannot follow a {:?} command",
                self.phase
            )));
        }

        let mut args = Vec::with_capacity(spec.handler.int_params());
        for _ in 0..spec.handler.int_params() {
            let token = rest.next().ok_or_else(|| {
                SheetError::BadSyntax(format!("'{name}' is missing a parameter"))
            })?;
            args.push(parse_index(token)?);
        }

        let text = if spec.handler.takes_text() {
            let token = rest.next().ok_or_else(|| {
                SheetError::BadSyntax(format!("'{name}' is missing its string parameter"))
            })?;
            Some(token.to_string())
        } else {
            None
        };

        Ok(Invocation { spec, args, text })
    }
}

/// Run `tokens` against `table` with the given registry.
///
/// Returns the number of commands executed.
pub fn execute_commands<S: AsRef<str>>(
    registry: &CommandRegistry,
    table: &mut Table,
    tokens: &[S],
) -> Result<usize> {
    let mut dispatcher = Dispatcher::new(registry);
    dispatcher.execute(table, tokens)?;
    Ok(dispatcher.executed())
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    /// The edited table, ready to be written out verbatim.
    pub output: Vec<u8>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub commands: usize,
}

/// Load `input`, run `tokens` against it and return the edited table.
///
/// Nothing is returned on failure; partial edits made before the failing
/// command are dropped with the table. An empty result is an error even
/// when every command succeeded.
pub fn edit_table<S: AsRef<str>>(
    registry: &CommandRegistry,
    input: &[u8],
    tokens: &[S],
    config: &SheetConfig,
) -> Result<EditReport> {
    let mut table = load_table(input, config)?;
    let rows_in = table.row_count();

    let outcome = execute_commands(registry, &mut table, tokens);
    if table.is_empty() {
        return Err(SheetError::TableEmpty);
    }
    let commands = outcome?;

    Ok(EditReport {
        rows_in,
        rows_out: table.row_count(),
        commands,
        output: table.into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;

    fn table(content: &str) -> Table {
        Table::new(content.as_bytes().to_vec(), b',', Limits::default()).unwrap()
    }

    fn run(content: &str, commands: &str) -> Result<String> {
        let registry = CommandRegistry::standard();
        let mut t = table(content);
        let tokens: Vec<&str> = commands.split_whitespace().collect();
        execute_commands(&registry, &mut t, &tokens)?;
        Ok(String::from_utf8(t.into_bytes()).unwrap())
    }

    #[test]
    fn test_registry_shapes() {
        let registry = CommandRegistry::standard();
        assert_eq!(registry.names().count(), 19);

        let cset = registry.lookup("cset").unwrap();
        assert_eq!(cset.kind, CommandKind::Data);
        assert_eq!(cset.handler.int_params(), 1);
        assert!(cset.handler.takes_text());

        let arow = registry.lookup("arow").unwrap();
        assert_eq!(arow.handler.int_params(), 0);

        let rows = registry.lookup("rows").unwrap();
        assert_eq!(rows.kind, CommandKind::Selection);
        assert_eq!(rows.handler.int_params(), 2);
        assert!(!rows.handler.takes_text());

        assert!(registry.lookup("ROWS").is_none());
    }

    #[test]
    fn test_phase_transitions() {
        use CommandKind::*;
        assert!(Phase::Fresh.admits(Layout));
        assert!(Phase::Fresh.admits(Data));
        assert!(Phase::Fresh.admits(Selection));
        assert!(Phase::Layout.admits(Layout));
        assert!(!Phase::Layout.admits(Data));
        assert!(!Phase::Layout.admits(Selection));
        assert!(!Phase::Data.admits(Layout));
        assert!(!Phase::Data.admits(Data));
        assert!(!Phase::Data.admits(Selection));
        assert!(Phase::Selection.admits(Selection));
        assert!(Phase::Selection.admits(Data));
        assert!(!Phase::Selection.admits(Layout));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("12"), Ok(Index::At(12)));
        assert_eq!(parse_index("-3"), Ok(Index::At(-3)));
        assert_eq!(parse_index("-"), Ok(Index::Last));
        assert!(matches!(parse_index("1x"), Err(SheetError::BadSyntax(_))));
        assert!(matches!(parse_index(""), Err(SheetError::BadSyntax(_))));
    }

    #[test]
    fn test_layout_sequence() {
        assert_eq!(run("a,b\n1,2\n", "drow 1 irow 1").unwrap(), ",\n1,2\n");
        assert_eq!(
            run("a,b\n1,2\n3,4\n", "acol").unwrap(),
            "a,b,\n1,2,\n3,4,\n"
        );
    }

    #[test]
    fn test_selection_then_data() {
        assert_eq!(
            run("a,b\n1,2\n3,4\n", "rows 2 2 cset 1 X").unwrap(),
            "a,b\nX,2\n3,4\n"
        );
        assert_eq!(
            run("ab\ncd\nac\n", "beginswith 1 a contains 1 c toupper 1").unwrap(),
            "ab\ncd\nAC\n"
        );
    }

    #[test]
    fn test_sentinel_parameters() {
        assert_eq!(run("a\nb\nc\n", "drow -").unwrap(), "a\nb\n");
        assert_eq!(run("a\nb\nc\n", "rows - - cset 1 z").unwrap(), "a\nb\nz\n");
        assert_eq!(run("a,b\n", "icol -").unwrap(), "a,b,\n");
    }

    #[test]
    fn test_no_commands() {
        assert_eq!(run("a\n", ""), Err(SheetError::NotFound));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(run("a\n", "frobnicate"), Err(SheetError::BadSyntax(_))));
    }

    #[test]
    fn test_bad_and_missing_parameters() {
        assert!(matches!(run("a\n", "drow x"), Err(SheetError::BadSyntax(_))));
        assert!(matches!(run("a\n", "drows 1"), Err(SheetError::BadSyntax(_))));
        assert!(matches!(run("a\n", "cset 1"), Err(SheetError::BadSyntax(_))));
    }

    #[test]
    fn test_order_violations() {
        assert!(matches!(run("a\nb\n", "arow rows 1 1"), Err(SheetError::BadOrder(_))));
        assert!(matches!(run("a\nb\n", "toupper 1 tolower 1"), Err(SheetError::BadOrder(_))));
        assert!(matches!(run("a\nb\n", "rows 1 1 irow 1"), Err(SheetError::BadOrder(_))));
        assert!(matches!(run("a\nb\n", "toupper 1 arow"), Err(SheetError::BadOrder(_))));
    }

    #[test]
    fn test_order_checked_before_parameters() {
        assert!(matches!(run("a\n", "arow rows x y"), Err(SheetError::BadOrder(_))));
    }

    #[test]
    fn test_handler_error_stops_sequence() {
        let registry = CommandRegistry::standard();
        let mut t = table("a\nb\n");
        let mut dispatcher = Dispatcher::new(&registry);
        let result = dispatcher.execute(&mut t, &["arow", "drow", "9", "arow"]);
        assert_eq!(result, Err(SheetError::OutOfRange));
        assert_eq!(dispatcher.executed(), 1);
        assert_eq!(dispatcher.phase(), Phase::Layout);
    }

    #[test]
    fn test_edit_table() {
        let registry = CommandRegistry::standard();
        let config = SheetConfig::with_delimiters(",;").unwrap();
        let report = edit_table(&registry, b"a;b\n1,2", &["arow"], &config).unwrap();
        assert_eq!(report.output, b"a,b\n1,2\n,\n".to_vec());
        assert_eq!(report.rows_in, 2);
        assert_eq!(report.rows_out, 3);
        assert_eq!(report.commands, 1);
    }

    #[test]
    fn test_edit_table_empty_result() {
        let registry = CommandRegistry::standard();
        let config = SheetConfig::with_delimiters(",").unwrap();
        assert_eq!(
            edit_table(&registry, b"a\nb\n", &["drows", "1", "2"], &config),
            Err(SheetError::TableEmpty)
        );
    }

    #[test]
    fn test_edit_table_empty_check_wins() {
        let registry = CommandRegistry::standard();
        let config = SheetConfig::with_delimiters(",").unwrap();
        let no_commands: [&str; 0] = [];
        assert_eq!(
            edit_table(&registry, b"", &no_commands, &config),
            Err(SheetError::TableEmpty)
        );
        assert_eq!(
            edit_table(&registry, b"a\n", &no_commands, &config),
            Err(SheetError::NotFound)
        );
    }

    #[test]
    fn test_executed_count() {
        let registry = CommandRegistry::standard();
        let mut t = table("a,b\n");
        let count = execute_commands(&registry, &mut t, &["arow", "acol", "drow", "1"]).unwrap();
        assert_eq!(count, 3);
        assert_eq!(t.as_bytes(), b",,\n");
    }
}
