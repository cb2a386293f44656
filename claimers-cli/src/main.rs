use std::{
    cmp::Ordering,
    collections::HashSet,
    error::Error,
    fmt,
    io::{self, BufRead, Write},
    process,
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use regex::{Captures, Regex};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use claimers::{
    board::{Board, BoardDimensions, Position, Tile},
    catalog::Catalog,
    ids::SessionId,
    layout::{Canvas, TILE_MARGIN_RATIO},
    service::{GameService, ServiceError},
    session::Player,
    store::{MemoryStore, Repository},
    terrain::{random::random_features, TerrainType},
};

fn main() -> io::Result<()> {
    let matches = App::new("Claimers")
        .version("0.1")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Command line territory-conquest game.")
        .arg(
            Arg::with_name("size")
                .short("s")
                .long("size")
                .value_name("SIZE")
                .help("number of tiles along each side of the board")
                .takes_value(true)
                .validator(|size| match size.parse::<usize>() {
                    Ok(size) if size > 0 && size <= 26 => Ok(()),
                    _ => Err(format!("size must be a number in range [1,26], got {}", size)),
                }),
        )
        .arg(
            Arg::with_name("catalog")
                .short("c")
                .long("catalog")
                .value_name("FILE")
                .help("YAML file with troop types and hand-made territories")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for the map generator, for repeatable maps")
                .takes_value(true)
                .validator(|seed| {
                    seed.parse::<u64>()
                        .map(|_| ())
                        .map_err(|_| format!("seed must be a non-negative integer, got {}", seed))
                }),
        )
        .arg(
            Arg::with_name("first_player")
                .short("f")
                .long("first_player")
                .value_name("FIRST_PLAYER")
                .help("pre-specify which player goes first")
                .takes_value(true)
                .possible_values(&["human", "me", "computer", "bot", "random", "rand"])
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more to stderr, repeat for more detail"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let catalog = match matches.value_of("catalog") {
        Some(path) => match Catalog::load(path) {
            Ok(mut catalog) => {
                if catalog.troops.is_empty() {
                    catalog.troops = Catalog::builtin().troops;
                }
                catalog
            }
            Err(err) => {
                eprintln!("{}: {}", path, err);
                process::exit(1);
            }
        },
        None => Catalog::builtin(),
    };
    let size = matches.value_of("size").and_then(|size| size.parse().ok());
    let mut rng = match matches.value_of("seed").and_then(|seed| seed.parse().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());

    let first = choose_first(&matches, &mut input)?;
    let mut game = Match::start(catalog, size, &mut rng).map_err(other_error)?;

    println!();
    println!("Claim territory. Type help or ? for commands.");
    let mut turn = first;
    loop {
        if game.free_tiles().map_err(other_error)?.is_empty() {
            game.finish().map_err(other_error)?;
            break;
        }
        match turn {
            Side::Human => {
                if let TurnEnd::Quit = human_turn(&mut game, &mut input)? {
                    game.service
                        .end_session(game.session, None)
                        .map_err(other_error)?;
                    println!("Game abandoned.");
                    break;
                }
            }
            Side::Bot => bot_turn(&mut game, &mut rng).map_err(other_error)?,
        }
        turn = turn.opponent();
    }
    Ok(())
}

/// Send logs to stderr, filtered by `RUST_LOG` or else by the number of `-v` flags.
fn init_logging(verbosity: u64) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn other_error<E: Into<Box<dyn Error + Send + Sync>>>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Which side of the table a player sits on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Side {
    Human,
    Bot,
}

impl Side {
    fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Bot,
            Side::Bot => Side::Human,
        }
    }
}

/// Choose which [`Side`] goes first based on either args or cli input.
fn choose_first<B: BufRead>(matches: &ArgMatches, input: &mut InputReader<B>) -> io::Result<Side> {
    Ok(if let Some(clichoice) = matches.value_of("first_player") {
        match clichoice.to_ascii_lowercase().as_str() {
            "human" | "me" => Side::Human,
            "computer" | "bot" => Side::Bot,
            _ if rand::random() => Side::Human,
            _ => Side::Bot,
        }
    } else {
        input.read_input_lower("Do you want to go first? (Y/n)", |input| match input {
            "yes" | "y" | "first" | "1" | "1st" | "" => Some(Side::Human),
            "no" | "n" | "second" | "2" | "2nd" => Some(Side::Bot),
            _ => {
                println!("Invalid selection.");
                None
            }
        })?
    })
}

/// A running game between the human and the bot.
struct Match {
    service: GameService<MemoryStore>,
    catalog: Catalog,
    board: Board,
    session: SessionId,
    human: Player,
    bot: Player,
}

impl Match {
    /// Create the game. Positions authored in the catalog keep their features, every
    /// other territory is generated.
    fn start(catalog: Catalog, size: Option<usize>, rng: &mut StdRng) -> Result<Self, ServiceError> {
        let mut service = GameService::new(MemoryStore::new());
        let game = service.new_game_with_terrain(size, |pos| match catalog.territory_at(pos) {
            Some(features) => features.clone(),
            None => random_features(&mut *rng),
        })?;
        for authored in &catalog.territories {
            if !game.board.dimensions.contains(authored.position) {
                warn!(position = %authored.position, "authored territory is off the board");
            }
        }

        let human = service.create_player("You")?;
        let bot = service.create_player("Bot")?;
        service.add_player_to_session(game.session.id, human.id)?;
        service.add_player_to_session(game.session.id, bot.id)?;
        info!(session = %game.session.id, "game started");

        Ok(Self {
            service,
            catalog,
            board: game.board,
            session: game.session.id,
            human,
            bot,
        })
    }

    fn free_tiles(&self) -> Result<Vec<Tile>, ServiceError> {
        Ok(self
            .service
            .store()
            .board_tiles(self.board.id)?
            .into_iter()
            .filter(|tile| tile.owner.is_none())
            .collect())
    }

    fn tiles_held(&self, player: &Player) -> Result<usize, ServiceError> {
        Ok(self.service.store().tiles_by_owner(player.id)?.len())
    }

    /// End the session once the board is full and announce the result.
    fn finish(&mut self) -> Result<(), ServiceError> {
        let mine = self.tiles_held(&self.human)?;
        let theirs = self.tiles_held(&self.bot)?;
        let winner = match mine.cmp(&theirs) {
            Ordering::Greater => Some(self.human.id),
            Ordering::Less => Some(self.bot.id),
            Ordering::Equal => None,
        };
        self.service.end_session(self.session, winner)?;
        println!();
        self.show()?;
        println!("Final count: you hold {}, the bot holds {}.", mine, theirs);
        match winner {
            Some(id) if id == self.human.id => println!("You win!"),
            Some(_) => println!("The bot wins."),
            None => println!("It's a draw."),
        }
        Ok(())
    }

    /// Print the board.
    fn show(&self) -> Result<(), ServiceError> {
        let grid = self.service.board_grid(self.session)?;
        let mut rows = Vec::with_capacity(self.board.dimensions.height());
        for row in grid.rows() {
            let mut cells = Vec::with_capacity(row.len());
            for tile in row {
                cells.push(match tile {
                    Some(tile) => self.cell(tile)?,
                    None => BoardCell {
                        terrain: None,
                        owner: Owner::Nobody,
                    },
                });
            }
            rows.push(cells);
        }
        show_board(
            self.board.dimensions.width(),
            rows.into_iter().map(|row| row.into_iter()),
        );
        let canvas = Canvas::default();
        println!("Legend: *xx yours, #xx the bot's. Type inspect x,y for details.");
        println!(
            "Drawn on a {}x{} canvas, {} tiles.",
            canvas.width,
            canvas.height,
            canvas.tile_rects(&self.board.dimensions).count()
        );
        Ok(())
    }

    fn cell(&self, tile: &Tile) -> Result<BoardCell, ServiceError> {
        let terrain = match tile.territory {
            Some(id) => Some(self.service.store().territory_get(id)?.features.terrain_type),
            None => None,
        };
        let owner = match tile.owner {
            None => Owner::Nobody,
            Some(id) if id == self.human.id => Owner::Human,
            Some(_) => Owner::Bot,
        };
        Ok(BoardCell { terrain, owner })
    }

    fn owner_name(&self, tile: &Tile) -> &str {
        match tile.owner {
            None => "nobody",
            Some(id) if id == self.human.id => "you",
            Some(_) => "the bot",
        }
    }
}

/// How a human turn ended.
enum TurnEnd {
    Done,
    Quit,
}

/// Read commands until the player claims a tile, passes or quits.
fn human_turn<B: BufRead>(game: &mut Match, input: &mut InputReader<B>) -> io::Result<TurnEnd> {
    enum Command {
        Show,
        Inspect(Position),
        Pixel(u32, u32),
        Troops,
        Modifiers(String, Position),
        Claim(Position),
        End,
        Help,
        Quit,
    }
    static INSPECT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:inspect|look|i)\s+
        (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$",
        )
        .expect("inspect pattern")
    });
    static PIXEL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?:pixel|px|p)\s+(?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$")
            .expect("pixel pattern")
    });
    static CLAIM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:claim|take|c)\s+
        (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$",
        )
        .expect("claim pattern")
    });
    static MODIFIERS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:modifiers|mods|m)\s+
        (?P<troop>.+?)\s+
        (?:(?:at|on)\s+)?
        (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$",
        )
        .expect("modifiers pattern")
    });

    println!();
    game.show().map_err(other_error)?;
    loop {
        let dim = game.board.dimensions;
        let cmd = input.read_input_lower("> ", |input| match input {
            "?" | "help" | "h" => Some(Command::Help),
            "show" | "board" | "s" => Some(Command::Show),
            "troops" | "t" => Some(Command::Troops),
            "end" | "pass" | "e" => Some(Command::End),
            "quit" | "exit" | "q" => Some(Command::Quit),
            other => {
                if let Some(captures) = CLAIM.captures(other) {
                    parse_position(&captures, dim).map(Command::Claim)
                } else if let Some(captures) = INSPECT.captures(other) {
                    parse_position(&captures, dim).map(Command::Inspect)
                } else if let Some(captures) = PIXEL.captures(other) {
                    match (captures["x"].parse(), captures["y"].parse()) {
                        (Ok(px), Ok(py)) => Some(Command::Pixel(px, py)),
                        _ => {
                            println!("Pixel coordinates are too large.");
                            None
                        }
                    }
                } else if let Some(captures) = MODIFIERS.captures(other) {
                    parse_position(&captures, dim)
                        .map(|pos| Command::Modifiers(captures["troop"].to_owned(), pos))
                } else {
                    println!("Invalid command \"{}\". Use '?' for help", other);
                    None
                }
            }
        })?;

        match cmd {
            Command::Show => game.show().map_err(other_error)?,
            Command::Inspect(pos) => inspect(game, pos).map_err(other_error)?,
            Command::Pixel(px, py) => {
                let canvas = Canvas::default();
                match canvas.tile_at(&game.board.dimensions, px, py) {
                    Some(pos) => inspect(game, pos).map_err(other_error)?,
                    None => println!(
                        "Pixel {},{} is off the {}x{} canvas.",
                        px, py, canvas.width, canvas.height
                    ),
                }
            }
            Command::Troops => {
                for troop in &game.catalog.troops {
                    println!(
                        "{:<16} {:<10} prefers {} to {}",
                        troop.name,
                        troop.movement_type,
                        troop.temperature_preference.min,
                        troop.temperature_preference.max
                    );
                }
            }
            Command::Modifiers(name, pos) => match game.catalog.troop(&name) {
                None => println!("Unknown troop \"{}\". Type troops to list them.", name),
                Some(troop) => {
                    let store = game.service.store();
                    let tile = store
                        .board_tile_at(game.board.id, pos)
                        .map_err(other_error)?;
                    match game.service.tile_modifiers(troop, tile.id) {
                        Ok(modifier) => println!(
                            "{} at {}: movement x{:.2}, combat x{:.2}",
                            troop.name, pos, modifier.movement, modifier.combat
                        ),
                        Err(err) => println!("{}", err),
                    }
                }
            },
            Command::Claim(pos) => {
                let held = game
                    .service
                    .store()
                    .board_tile_at(game.board.id, pos)
                    .map(|tile| tile.is_owned_by(game.human.id))
                    .map_err(other_error)?;
                if held {
                    println!("You already hold {}.", pos);
                    continue;
                }
                match game.service.claim_tile(game.session, game.human.id, pos) {
                    Ok(_) => {
                        println!("You claimed {}.", pos);
                        return Ok(TurnEnd::Done);
                    }
                    Err(ServiceError::TileOwned { .. }) => {
                        println!("The bot already holds {}.", pos)
                    }
                    Err(err) => println!("Cannot claim {}: {}", pos, err),
                }
            }
            Command::End => return Ok(TurnEnd::Done),
            Command::Quit => return Ok(TurnEnd::Quit),
            Command::Help => {
                println!(
                    "Available Commands:
    show                          print the board.
    inspect <x>,<y>               describe the territory under a tile.
    pixel <px>,<py>               inspect the tile drawn under a canvas pixel.
    troops                        list the troop types.
    modifiers <troop> [at] <x>,<y>
                                  movement and combat multipliers of a troop on a tile.
    claim <x>,<y>                 claim a free tile. Ends your turn.
    end                           pass your turn.
    quit                          abandon the game.",
                );
            }
        }
    }
}

/// Parse the `x` and `y` captures as a position on the board, printing the problem if
/// they are not one.
fn parse_position(captures: &Captures, dim: BoardDimensions) -> Option<Position> {
    let x = match captures["x"].parse::<usize>() {
        Ok(x) if x < dim.width() => x,
        _ => {
            println!("x must be in range [0,{}], got {}", dim.width() - 1, &captures["x"]);
            return None;
        }
    };
    let y = match captures["y"].parse::<usize>() {
        Ok(y) if y < dim.height() => y,
        _ => {
            println!("y must be in range [0,{}], got {}", dim.height() - 1, &captures["y"]);
            return None;
        }
    };
    Some(Position::new(x, y))
}

/// Describe the territory at a position.
fn inspect(game: &Match, pos: Position) -> Result<(), ServiceError> {
    let territory = game.service.territory_at(game.session, pos)?;
    let tile = game.service.store().board_tile_at(game.board.id, pos)?;
    let features = &territory.features;
    println!("{} ({}), held by {}", features.terrain_type, pos, game.owner_name(&tile));
    println!("  temperature {}, elevation {}", features.temperature, features.elevation);
    let rect = Canvas::default()
        .tile_rect(&game.board.dimensions, pos)
        .inset(TILE_MARGIN_RATIO);
    println!(
        "  drawn at {},{}, {}x{} px",
        rect.x, rect.y, rect.width, rect.height
    );
    if features.tags.is_empty() {
        println!("  no tags");
    } else {
        let tags: Vec<_> = features.tags.iter().map(|tag| tag.label()).collect();
        println!("  tags: {}", tags.join(", "));
    }
    Ok(())
}

/// Score bonus for a free tile bordering one the bot already holds.
const FRONTIER_BONUS: f64 = 1.5;

/// The bot claims the free tile where its favorite troop does best, preferring tiles
/// next to its own. Ties are broken at random.
fn bot_turn(game: &mut Match, rng: &mut StdRng) -> Result<(), ServiceError> {
    let mut free = game.free_tiles()?;
    free.shuffle(rng);
    let held: HashSet<Position> = game
        .service
        .store()
        .tiles_by_owner(game.bot.id)?
        .into_iter()
        .map(|tile| tile.position)
        .collect();
    let dim = game.board.dimensions;

    let mut best: Option<(f64, Position)> = None;
    for tile in &free {
        let mut score = match game.catalog.troops.first() {
            Some(troop) => match game.service.tile_modifiers(troop, tile.id) {
                Ok(modifier) => modifier.movement * modifier.combat,
                Err(ServiceError::NoTerritory(_)) => 1.0,
                Err(err) => return Err(err),
            },
            None => 1.0,
        };
        if dim.neighbors(tile.position).any(|pos| held.contains(&pos)) {
            score *= FRONTIER_BONUS;
        }
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, tile.position));
        }
    }
    let target = best.map(|(_, pos)| pos);
    if let Some(pos) = target {
        game.service.claim_tile(game.session, game.bot.id, pos)?;
        debug!(%pos, "bot claimed tile");
        println!("The bot claimed {}.", pos);
    }
    Ok(())
}

/// Who holds a tile, from the human's point of view.
#[derive(Copy, Clone)]
enum Owner {
    Nobody,
    Human,
    Bot,
}

/// Display helper for one tile of the board.
struct BoardCell {
    terrain: Option<TerrainType>,
    owner: Owner,
}

impl fmt::Display for BoardCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let abbrev = self.terrain.map_or("??", terrain_abbrev);
        match self.owner {
            Owner::Nobody => f.pad(abbrev),
            Owner::Human => f.pad(&format!("*{}", abbrev)),
            Owner::Bot => f.pad(&format!("#{}", abbrev)),
        }
    }
}

fn terrain_abbrev(terrain: TerrainType) -> &'static str {
    match terrain {
        TerrainType::Plains => "pl",
        TerrainType::Hills => "hi",
        TerrainType::Mountains => "mt",
        TerrainType::Snow => "sn",
        TerrainType::Desert => "de",
        TerrainType::Forest => "fo",
        TerrainType::Swamp => "sw",
        TerrainType::Water => "wa",
    }
}

/// Show the board by printing the grid. Takes an iterator over the rows of iterators over
/// the items
fn show_board(width: usize, rows: impl Iterator<Item = impl Iterator<Item = impl fmt::Display>>) {
    print!("   ");
    for i in 0..width {
        print!("{:^5}", i);
    }
    println!();
    for (i, row) in rows.enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            print!("{:^5}", cell);
        }
        println!();
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_line(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Print the prompt and read a line into the buffer. Exits on end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            process::exit(0);
        }
        Ok(())
    }
}
