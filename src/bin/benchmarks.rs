use std::collections::BTreeMap;
use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use clap::builder::RangedU64ValueParser;
use clap::{value_parser, Parser};
use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rbtree_map::util::{make_permutation, seeded_rng};
use rbtree_map::{Backing, OrderedMap, ParseBackingError};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tree(Backing),
    BTree,
}

impl FromStr for Target {
    type Err = ParseBackingError;

    fn from_str(s: &str) -> Result<Target, ParseBackingError> {
        match s.trim() {
            "btree" => Ok(Target::BTree),
            name => name.parse().map(Target::Tree),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Target::Tree(backing) => write!(fmt, "{}", backing),
            Target::BTree => write!(fmt, "BTreeMap"),
        }
    }
}


/// Times insert, lookup and delete of random permutations for each ordered-map backing.
#[derive(Parser, Debug)]
#[command(name = "benchmarks", about, long_about = None)]
struct BenchConfig {
    /// Number of keys
    #[arg(default_value_t = 100_000, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    n: usize,

    /// Iterations to average over
    #[arg(default_value_t = 10, value_parser = value_parser!(u64).range(1..))]
    iters: u64,

    /// Comma-separated backings to time: redblack, plain, btree
    #[arg(value_delimiter = ',', default_values = ["redblack", "plain", "btree"])]
    targets: Vec<Target>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, env = "RBTREE_MAP_LOG", default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level.parse().map_err(|_| format!("invalid log level '{}'", level))
}


/// What a benchmark cycle needs from a map.
trait BenchMap {
    fn put(&mut self, key: usize, val: usize);
    fn get(&self, key: &usize) -> Option<&usize>;
    fn take(&mut self, key: &usize) -> Option<usize>;
    fn len(&self) -> usize;
}

impl BenchMap for Box<dyn OrderedMap<usize, usize>> {
    fn put(&mut self, key: usize, val: usize) { self.insert(key, val); }
    fn get(&self, key: &usize) -> Option<&usize> { self.lookup(key) }
    fn take(&mut self, key: &usize) -> Option<usize> { self.delete(key).ok() }
    fn len(&self) -> usize { self.size() }
}

impl BenchMap for BTreeMap<usize, usize> {
    fn put(&mut self, key: usize, val: usize) { self.insert(key, val); }
    fn get(&self, key: &usize) -> Option<&usize> { BTreeMap::get(self, key) }
    fn take(&mut self, key: &usize) -> Option<usize> { self.remove(key) }
    fn len(&self) -> usize { BTreeMap::len(self) }
}


#[derive(Default)]
struct Timings {
    insert: u64,
    lookup: u64,
    delete: u64,
}

fn bench_cycle<M: BenchMap, F: Fn() -> M>(make: F, n: usize, iters: u64) -> Timings {
    let mut rng = seeded_rng(1);
    let mut timings = Timings::default();

    for iter in 0..iters {
        let insert_keys = make_permutation(n, &mut rng);
        let delete_keys = make_permutation(n, &mut rng);
        let mut map = make();

        let start = Instant::now();
        for &key in insert_keys.iter() {
            map.put(key, key);
        }
        timings.insert += nanos(start.elapsed());

        let start = Instant::now();
        for key in 0..n {
            black_box(map.get(&key));
        }
        timings.lookup += nanos(start.elapsed());

        let start = Instant::now();
        for key in delete_keys.iter() {
            black_box(map.take(key));
        }
        timings.delete += nanos(start.elapsed());

        assert_eq!(map.len(), 0, "map not empty after teardown");
        debug!("iteration {} done", iter);
    }

    timings
}

#[inline]
fn nanos(d: Duration) -> u64 {
    d.as_secs()*1000000000 + d.subsec_nanos() as u64
}


fn main() {
    let config = BenchConfig::parse();

    if let Err(err) = TermLogger::init(config.log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("failed to install logger: {}", err);
    }
    info!("{:?}", config);

    let (n, iters) = (config.n, config.iters);
    for &target in config.targets.iter() {
        let timings = match target {
            Target::Tree(backing) => bench_cycle(|| backing.build::<usize, usize>(), n, iters),
            Target::BTree => bench_cycle(BTreeMap::<usize, usize>::new, n, iters),
        };

        println!("{}: average time over {} iterations with {} keys: insert {}ns, lookup {}ns, delete {}ns",
                 target, iters, n, timings.insert/iters, timings.lookup/iters, timings.delete/iters);
    }
}


#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use clap::Parser;
    use log::LevelFilter;
    use rbtree_map::Backing;
    use super::{bench_cycle, BenchConfig, Target};

    #[test]
    fn defaults() {
        let config = BenchConfig::try_parse_from(["benchmarks", "--log-level", "info"]).unwrap();
        assert_eq!(config.n, 100_000);
        assert_eq!(config.iters, 10);
        assert_eq!(config.targets, vec![Target::Tree(Backing::RedBlack), Target::Tree(Backing::Plain), Target::BTree]);
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn explicit_values() {
        let config = BenchConfig::try_parse_from(["benchmarks", "500", "2", "plain,btree", "--log-level", "trace"]).unwrap();
        assert_eq!(config.n, 500);
        assert_eq!(config.iters, 2);
        assert_eq!(config.targets, vec![Target::Tree(Backing::Plain), Target::BTree]);
        assert_eq!(config.log_level, LevelFilter::Trace);
    }

    #[test]
    fn rejects_bad_input() {
        fn kind(args: &[&str]) -> Option<ErrorKind> {
            BenchConfig::try_parse_from(args.iter().copied()).err().map(|err| err.kind())
        }

        assert_eq!(kind(&["benchmarks", "abc"]), Some(ErrorKind::ValueValidation));
        assert_eq!(kind(&["benchmarks", "0"]), Some(ErrorKind::ValueValidation));
        assert_eq!(kind(&["benchmarks", "10", "0"]), Some(ErrorKind::ValueValidation));
        assert_eq!(kind(&["benchmarks", "10", "1", "redblack,avl"]), Some(ErrorKind::ValueValidation));
        assert_eq!(kind(&["benchmarks", "--log-level", "loud"]), Some(ErrorKind::ValueValidation));
        assert_eq!(kind(&["benchmarks", "--verbose"]), Some(ErrorKind::UnknownArgument));
    }

    #[test]
    fn cycle_tears_down() {
        let timings = bench_cycle(|| Backing::RedBlack.build::<usize, usize>(), 200, 2);
        assert!(timings.insert > 0);
    }
}
