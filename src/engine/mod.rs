//! Run orchestration.
//!
//! The pipeline is strictly staged: sequence store, k-mer tables, frequency
//! cutoff, seed generation (with optional verification and debug listings),
//! diagonal band filtering, parallel extension, assembly, output. All
//! validation happens before the first table is built; once extension
//! starts, no error can originate from user input.

use std::fs::File;
use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::common::{write_records, AlignmentRecord, SeedAnnotation};
use crate::config::{SeedExtendConfig, StrategyChoice};
use crate::error::{EngineError, EngineResult};
use crate::extend::{
    bias_adjusted_floor, evaluate_segments, extend_seed, ExtensionStrategy, GreedyParams,
    XdropParams,
};
use crate::index::frequency::{CutoffRationale, FrequencyCutoff, FrequencyHistogram};
use crate::index::{build_kmer_table, KmerTable};
use crate::seed::filter::filter_by_diagonal_bands;
use crate::seed::verify::verify_pairing;
use crate::seed::{generate_seed_pairs, PairingRules, SeedPair};
use crate::sequence::{Collection, SequenceStore, Strand};

/// Seed pairs of every active strand pairing, plus the cutoff they were
/// generated under.
#[derive(Debug)]
pub struct SeedGeneration {
    pub cutoff: FrequencyCutoff,
    pub strands: Vec<(Strand, Vec<SeedPair>)>,
}

fn print_kmer_table(table: &KmerTable) {
    for occ in table.occurrences() {
        println!("# Kmer ({},{},{})", occ.code, occ.seqnum, occ.endpos);
    }
}

fn print_seed_pairs(pairs: &[SeedPair]) {
    for pair in pairs {
        println!(
            "# SeedPair ({},{},{},{})",
            pair.seq1, pair.seq2, pair.pos2, pair.pos1
        );
    }
}

fn resolve_cutoff(
    config: &SeedExtendConfig,
    pairings: &[(&KmerTable, &KmerTable, bool)],
) -> EngineResult<FrequencyCutoff> {
    let mut cutoff = match config.maxfreq {
        Some(limit) => FrequencyCutoff::explicit(limit),
        None => FrequencyCutoff::unbounded(),
    };
    let Some(budget) = config.memlimit_bytes else {
        return Ok(cutoff);
    };

    let mut histogram = FrequencyHistogram::new();
    for &(table1, table2, same_table) in pairings {
        histogram.add_pairing(table1, table2, same_table);
    }
    let budget_limit = histogram.cutoff_for_budget(budget)?;
    let constrained = budget_limit < histogram.max_frequency().unwrap_or(0);

    if constrained && budget_limit < cutoff.limit {
        cutoff = FrequencyCutoff {
            limit: budget_limit,
            rationale: CutoffRationale::MemoryBudget,
        };
        eprintln!(
            "# Only {}-mers occurring <= {} times will be considered, \
             due to small memlimit. Expect {} seed pairs.",
            config.seedlength,
            budget_limit,
            histogram.expected_pairs_at(budget_limit)
        );
    } else if config.maxfreq.is_some() {
        println!(
            "# Set k-mer maximum frequency to {}, expect {} seed pairs",
            cutoff.limit,
            histogram.expected_pairs_at(cutoff.limit)
        );
    }
    Ok(cutoff)
}

/// Build the k-mer tables and generate the seed pairs of every active
/// strand pairing.
pub fn generate_seeds(
    config: &SeedExtendConfig,
    store: &SequenceStore,
) -> EngineResult<SeedGeneration> {
    let seedlength = config.seedlength as usize;
    let maxlen = store.longest_seq_len();
    if seedlength > maxlen {
        return Err(EngineError::data(format!(
            "option \"--seedlength\" must be an integer <= {maxlen} \
             (length of longest sequence)"
        )));
    }

    let has_query = store.has_query_collection();
    let second = store.second_collection();

    let table1 = build_kmer_table(store, Collection::Primary, Strand::Forward, seedlength);
    if config.verbose {
        println!("# ...found {} {}-mers", table1.len(), seedlength);
    }
    if config.debug_kmer {
        print_kmer_table(&table1);
    }

    let table2_forward = (config.forward && has_query)
        .then(|| build_kmer_table(store, second, Strand::Forward, seedlength));
    let table2_reverse = config
        .reverse
        .then(|| build_kmer_table(store, second, Strand::Reverse, seedlength));
    if config.debug_kmer {
        if let Some(table) = &table2_forward {
            print_kmer_table(table);
        }
        if let Some(table) = &table2_reverse {
            print_kmer_table(table);
        }
    }

    let forward_rules = PairingRules {
        seedlength: config.seedlength,
        allow_overlap: config.overlappingseeds,
        same_table: !has_query,
        same_collection: !has_query,
    };
    let reverse_rules = PairingRules {
        seedlength: config.seedlength,
        allow_overlap: config.overlappingseeds,
        same_table: false,
        same_collection: !has_query,
    };

    let mut pairings: Vec<(&KmerTable, &KmerTable, bool)> = Vec::new();
    if config.forward {
        pairings.push((&table1, table2_forward.as_ref().unwrap_or(&table1), !has_query));
    }
    if let Some(table) = &table2_reverse {
        pairings.push((&table1, table, false));
    }
    let cutoff = resolve_cutoff(config, &pairings)?;

    let mut strands = Vec::new();
    if config.forward {
        let table2 = table2_forward.as_ref().unwrap_or(&table1);
        let pairs = generate_seed_pairs(&table1, table2, cutoff.limit, forward_rules);
        if config.verify {
            verify_pairing(
                &pairs,
                store,
                second,
                Strand::Forward,
                cutoff.limit,
                forward_rules,
                "forward",
            )?;
        }
        if config.verbose {
            println!("# ...collected {} seed pairs", pairs.len());
        }
        if config.debug_seedpair {
            print_seed_pairs(&pairs);
        }
        strands.push((Strand::Forward, pairs));
    }
    if let Some(table2) = &table2_reverse {
        let pairs = generate_seed_pairs(&table1, table2, cutoff.limit, reverse_rules);
        if config.verify {
            verify_pairing(
                &pairs,
                store,
                second,
                Strand::Reverse,
                cutoff.limit,
                reverse_rules,
                "rev.compl.",
            )?;
        }
        if config.verbose {
            println!("# ...collected {} rev.compl. seed pairs", pairs.len());
        }
        if config.debug_seedpair {
            print_seed_pairs(&pairs);
        }
        strands.push((Strand::Reverse, pairs));
    }

    Ok(SeedGeneration { cutoff, strands })
}

/// One unit of parallel work: all surviving seeds of a sequence pair on one
/// strand, extended sequentially in seed order.
struct ExtensionGroup {
    strand: Strand,
    seq1: u32,
    seq2: u32,
    pairs: Vec<SeedPair>,
}

fn group_pairs(strands: Vec<(Strand, Vec<SeedPair>)>) -> Vec<ExtensionGroup> {
    let mut groups = Vec::new();
    for (strand, pairs) in strands {
        let mut start = 0;
        while start < pairs.len() {
            let (seq1, seq2) = (pairs[start].seq1, pairs[start].seq2);
            let end = start
                + pairs[start..]
                    .iter()
                    .position(|p| (p.seq1, p.seq2) != (seq1, seq2))
                    .unwrap_or(pairs.len() - start);
            groups.push(ExtensionGroup {
                strand,
                seq1,
                seq2,
                pairs: pairs[start..end].to_vec(),
            });
            start = end;
        }
    }
    groups
}

fn build_strategy(config: &SeedExtendConfig, store: &SequenceStore) -> ExtensionStrategy {
    match config.strategy {
        StrategyChoice::Xdrop => ExtensionStrategy::Xdrop(XdropParams {
            xdropbelow: config.xdropbelow,
        }),
        StrategyChoice::Greedy => {
            let mut floor = config.percmathistory;
            if config.bias_parameters {
                floor = bias_adjusted_floor(floor, &store.composition());
            }
            ExtensionStrategy::Greedy(GreedyParams {
                history: config.history,
                percmathistory: floor,
                maxalilendiff: config.maxalilendiff,
                maxerr_percent: config.maxerr_percent(),
                scoredrop: config.xdropbelow,
            })
        }
    }
}

fn extend_group(
    config: &SeedExtendConfig,
    store: &SequenceStore,
    strategy: &ExtensionStrategy,
    group: &ExtensionGroup,
) -> Vec<AlignmentRecord> {
    let seedlength = config.seedlength;
    let codes1 = store.codes_view(
        Collection::Primary,
        group.seq1 as usize,
        Strand::Forward,
        config.cam,
    );
    let codes2 = store.codes_view(
        store.second_collection(),
        group.seq2 as usize,
        group.strand,
        config.cam,
    );

    let mut records = Vec::new();
    let mut covered: Vec<(u32, u32, u32, u32)> = Vec::new();
    for pair in &group.pairs {
        let seed_start1 = pair.pos1 + 1 - seedlength;
        let seed_start2 = pair.pos2 + 1 - seedlength;
        if !config.overlappingseeds
            && covered.iter().any(|&(s1, e1, s2, e2)| {
                s1 <= seed_start1 && pair.pos1 < e1 && s2 <= seed_start2 && pair.pos2 < e2
            })
        {
            continue;
        }

        let ext = extend_seed(
            strategy,
            &codes1,
            &codes2,
            pair.pos1 as usize,
            pair.pos2 as usize,
            seedlength as usize,
        );
        if (ext.alignment_len() as u64) < config.alignlength {
            continue;
        }
        let eval = evaluate_segments(
            &codes1[ext.start1..ext.end1],
            &codes2[ext.start2..ext.end2],
        );
        if eval.identity < config.minidentity as f64 {
            continue;
        }

        covered.push((
            ext.start1 as u32,
            ext.end1 as u32,
            ext.start2 as u32,
            ext.end2 as u32,
        ));
        records.push(AlignmentRecord {
            len1: ext.len1() as u32,
            seq1: group.seq1,
            start1: ext.start1 as u32,
            strand: group.strand,
            len2: ext.len2() as u32,
            seq2: group.seq2,
            start2: ext.start2 as u32,
            score: eval.score,
            editdist: eval.editdist,
            identity: eval.identity,
            seed: Some(SeedAnnotation {
                seedlength,
                pos1: pair.pos1,
                pos2: pair.pos2,
            }),
        });
    }
    records
}

/// Filter, extend in parallel, and assemble the final records.
pub fn extend_and_assemble(
    config: &SeedExtendConfig,
    store: &SequenceStore,
    generation: SeedGeneration,
) -> EngineResult<Vec<AlignmentRecord>> {
    let filtered: Vec<(Strand, Vec<SeedPair>)> = generation
        .strands
        .into_iter()
        .map(|(strand, pairs)| {
            (
                strand,
                filter_by_diagonal_bands(
                    pairs,
                    config.diagbandwidth,
                    config.mincoverage,
                    config.seedlength as u64,
                    config.overlappingseeds,
                ),
            )
        })
        .collect();

    let groups = group_pairs(filtered);
    let strategy = build_strategy(config, store);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or_else(num_cpus::get))
        .build()
        .map_err(|e| EngineError::resource(format!("cannot build thread pool: {e}")))?;

    let bar = if config.verbose {
        let bar = ProgressBar::new(groups.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} sequence pairs")
        {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    // positional merge order makes the result independent of scheduling
    let per_group: Vec<Vec<AlignmentRecord>> = pool.install(|| {
        groups
            .par_iter()
            .map(|group| {
                let records = extend_group(config, store, &strategy, group);
                bar.inc(1);
                records
            })
            .collect()
    });
    bar.finish_and_clear();

    let records = per_group.into_iter().flatten().collect();
    Ok(crate::report::assemble(records))
}

/// Library entry point: the full pipeline without any terminal output.
pub fn compute_records(
    config: &SeedExtendConfig,
    store: &SequenceStore,
) -> EngineResult<Vec<AlignmentRecord>> {
    let generation = generate_seeds(config, store)?;
    extend_and_assemble(config, store, generation)
}

fn load_store(config: &SeedExtendConfig) -> Result<SequenceStore> {
    match &config.query_path {
        Some(query) => SequenceStore::from_fasta_pair(&config.primary_path, query),
        None => SequenceStore::from_fasta_file(&config.primary_path),
    }
}

/// Application entry point: load, align, write, report timings.
pub fn run(config: &SeedExtendConfig) -> Result<()> {
    let started = Instant::now();
    let store = load_store(config)?;
    if config.verbose {
        eprintln!(
            "[INFO] Loaded {} sequences",
            store.num_sequences(Collection::Primary)
                + store.num_sequences(store.second_collection())
                    * usize::from(store.has_query_collection())
        );
    }
    let load_time = started.elapsed();

    let seed_start = Instant::now();
    let generation = generate_seeds(config, &store)?;
    let seed_time = seed_start.elapsed();

    if config.only_seeds {
        if config.benchmark {
            println!("# TIME sequences {:.3}s", load_time.as_secs_f64());
            println!("# TIME seeds {:.3}s", seed_time.as_secs_f64());
            println!("# TIME total {:.3}s", started.elapsed().as_secs_f64());
        }
        return Ok(());
    }

    let extend_start = Instant::now();
    let records = extend_and_assemble(config, &store, generation)?;
    let extend_time = extend_start.elapsed();

    let mut out: Box<dyn Write> = match &config.outfile {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    write_records(&records, config.seed_display, &mut *out).context("cannot write alignments")?;

    if config.benchmark {
        println!("# TIME sequences {:.3}s", load_time.as_secs_f64());
        println!("# TIME seeds {:.3}s", seed_time.as_secs_f64());
        println!("# TIME extension {:.3}s", extend_time.as_secs_f64());
        println!("# TIME total {:.3}s", started.elapsed().as_secs_f64());
    }
    if config.verbose {
        eprintln!("[INFO] Reported {} alignments", records.len());
    }
    Ok(())
}
