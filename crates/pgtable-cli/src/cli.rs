use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "pgtable.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Ddl,
    Templates,
    Query,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Ddl(EntityArgs),
    Templates(EntityArgs),
    Query(QueryArgs),
}

/// Arguments of commands that print statements for one or every entity.
#[derive(Debug, Clone)]
pub struct EntityArgs {
    pub config: PathBuf,
    pub entity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Count,
    Delete,
    DeleteReturningId,
    Update,
}

impl QueryKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "select" => Some(Self::Select),
            "count" => Some(Self::Count),
            "delete" => Some(Self::Delete),
            "delete-returning-id" => Some(Self::DeleteReturningId),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub kind: QueryKind,
    pub config: PathBuf,
    pub entity: String,
    /// JSON object of field filters, see `input::parse_filters`.
    pub filters: Option<String>,
    /// JSON object of field values for `update`.
    pub set: Option<String>,
    pub order: Vec<String>,
    pub limit: u64,
    pub offset: u64,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "ddl" => parse_entity_args(it.map(|s| s.as_str()), HelpTopic::Ddl, Command::Ddl),
        "templates" => parse_entity_args(
            it.map(|s| s.as_str()),
            HelpTopic::Templates,
            Command::Templates,
        ),
        "query" => parse_query(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Value of `--flag VALUE` or `--flag=VALUE`; `None` when `token` is another argument.
fn flag_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    Ok(token
        .strip_prefix(flag)
        .and_then(|rest| rest.strip_prefix('=')))
}

fn parse_entity_args<'a>(
    mut it: impl Iterator<Item = &'a str>,
    topic: HelpTopic,
    command: fn(EntityArgs) -> Command,
) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut entity: Option<String> = None;

    while let Some(token) = it.next() {
        if token == "-h" || token == "--help" {
            return Ok(Command::Help(topic));
        }
        if let Some(v) = flag_value("--config", token, &mut it)? {
            config = PathBuf::from(v);
        } else if let Some(v) = flag_value("--entity", token, &mut it)? {
            entity = Some(v.to_string());
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    Ok(command(EntityArgs { config, entity }))
}

fn parse_query<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut kind: Option<QueryKind> = None;

    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut entity: Option<String> = None;
    let mut filters: Option<String> = None;
    let mut set: Option<String> = None;
    let mut order: Vec<String> = Vec::new();
    let mut limit = 0;
    let mut offset = 0;

    while let Some(token) = it.next() {
        if token == "-h" || token == "--help" {
            return Ok(Command::Help(HelpTopic::Query));
        }
        if kind.is_none() && !token.starts_with('-') {
            let Some(k) = QueryKind::parse(token) else {
                anyhow::bail!("unknown query kind: {token}");
            };
            kind = Some(k);
        } else if let Some(v) = flag_value("--config", token, &mut it)? {
            config = PathBuf::from(v);
        } else if let Some(v) = flag_value("--entity", token, &mut it)? {
            entity = Some(v.to_string());
        } else if let Some(v) = flag_value("--filters", token, &mut it)? {
            filters = Some(v.to_string());
        } else if let Some(v) = flag_value("--set", token, &mut it)? {
            set = Some(v.to_string());
        } else if let Some(v) = flag_value("--order", token, &mut it)? {
            order = split_csv(v);
        } else if let Some(v) = flag_value("--limit", token, &mut it)? {
            limit = v
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid --limit {v}: {e}"))?;
        } else if let Some(v) = flag_value("--offset", token, &mut it)? {
            offset = v
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid --offset {v}: {e}"))?;
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    let Some(kind) = kind else {
        return Ok(Command::Help(HelpTopic::Query));
    };
    let Some(entity) = entity else {
        anyhow::bail!("--entity is required");
    };
    if kind == QueryKind::Update && set.is_none() {
        anyhow::bail!("update requires --set");
    }
    if kind != QueryKind::Update && set.is_some() {
        anyhow::bail!("--set is only valid for update");
    }

    Ok(Command::Query(QueryArgs {
        kind,
        config,
        entity,
        filters,
        set,
        order,
        limit,
        offset,
    }))
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
pgtable - print precomputed PostgreSQL statements for entities

USAGE:
  pgtable <COMMAND> [OPTIONS]

COMMANDS:
  ddl           Print CREATE TABLE for each entity
  templates     Print every fixed statement for each entity
  query         Build a dynamic SELECT/COUNT/DELETE/UPDATE

Run `pgtable <command> --help` for more."
            );
        }
        HelpTopic::Ddl => {
            println!(
                "\
USAGE:
  pgtable ddl [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: pgtable.toml)
  --entity <NAME>       Only this entity (default: all)
  -h, --help            Print help"
            );
        }
        HelpTopic::Templates => {
            println!(
                "\
USAGE:
  pgtable templates [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: pgtable.toml)
  --entity <NAME>       Only this entity (default: all)
  -h, --help            Print help"
            );
        }
        HelpTopic::Query => {
            println!(
                "\
USAGE:
  pgtable query <select|count|delete|delete-returning-id|update> --entity <NAME> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: pgtable.toml)
  --entity <NAME>       Entity to query (required)
  --filters <JSON>      Field filters, e.g. '{{\"Price\":{{\"op\":\"gt\",\"value\":10}}}}'
                        The \"_\" key holds a raw clause:
                        '{{\"_\":{{\"conjunction\":\"or\",\"args\":[\".Age IN (?)\",[1,2]]}}}}'
  --set <JSON>          Values to set (update only), e.g. '{{\"Price\":12}}'
  --order <CSV>         Field,direction pairs, e.g. Age,desc,Price,asc
  --limit <N>           LIMIT (0 = none)
  --offset <N>          OFFSET
  -h, --help            Print help

OPERATORS:
  eq ne like match gt lt ge le bit"
            );
        }
    }
}
