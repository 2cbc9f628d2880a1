//! Tests for command-line parsing and command dispatch

#[cfg(test)]
mod tests {
    use clap::Parser;
    use fencebench::algorithm::generation::GeneratorConfig;
    use fencebench::io::cli::{Cli, Command, ValidateArgs, run, validate_files};
    use fencebench::io::configuration::{
        DEFAULT_INSTANCE_COUNT, DEFAULT_OUTPUT_ROOT, DEFAULT_REPORT_DIR, DEFAULT_SEED,
    };
    use fencebench::io::instance::GenerationMode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Tests generate with only the output directory uses defaults
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_generate_minimal_args() {
        let cli = Cli::parse_from(["fencebench", "generate", "corpus"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        assert_eq!(args.out_dir, PathBuf::from("corpus"));
        assert_eq!(args.count, DEFAULT_INSTANCE_COUNT);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.rows, None);
        assert_eq!(args.generator_config(), GeneratorConfig::default());
        assert!(matches!(
            args.batch_config().mode,
            GenerationMode::Embedded(_)
        ));
        assert!(!cli.quiet);
    }

    // Tests every generate option reaches the batch configuration
    // Verified by dropping the fixed dimensions
    #[test]
    fn test_generate_all_args() {
        let cli = Cli::parse_from([
            "fencebench",
            "generate",
            "out",
            "-n",
            "3",
            "--seed",
            "9",
            "--rows",
            "4",
            "--cols",
            "6",
            "--max-connectors",
            "5",
            "--min-edges",
            "2",
            "--max-edges",
            "3",
            "--scatter",
            "--density",
            "0.5",
            "--quiet",
        ]);
        assert!(cli.quiet);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        let batch = args.batch_config();
        assert_eq!(batch.count, 3);
        assert_eq!(batch.seed, 9);
        assert_eq!(batch.rows, Some(4));
        assert_eq!(batch.cols, Some(6));
        assert_eq!(batch.mode, GenerationMode::Scatter { density: 0.5 });

        let config = args.generator_config();
        assert_eq!(config.max_connectors, 5);
        assert_eq!(config.min_edges, 2);
        assert_eq!(config.max_edges, 3);
    }

    // Tests bench arguments map onto the benchmark configuration
    // Verified by dropping the build command
    #[test]
    fn test_bench_args() {
        let cli = Cli::parse_from([
            "fencebench",
            "-q",
            "bench",
            "./solver",
            "data/small",
            "data/large",
            "--build",
            "make solver",
        ]);
        assert!(!cli.should_show_progress());
        let Command::Bench(args) = cli.command else {
            panic!("expected bench");
        };

        let config = args.benchmark_config();
        assert_eq!(config.solver, PathBuf::from("./solver"));
        assert_eq!(
            config.input_dirs,
            vec![PathBuf::from("data/small"), PathBuf::from("data/large")]
        );
        assert_eq!(config.build.as_deref(), Some("make solver"));
        assert_eq!(config.output_root, PathBuf::from(DEFAULT_OUTPUT_ROOT));
        assert_eq!(config.report_dir, PathBuf::from(DEFAULT_REPORT_DIR));
    }

    // Tests bench refuses to run without an input directory
    // Verified by making input directories optional
    #[test]
    fn test_bench_requires_input_dir() {
        assert!(Cli::try_parse_from(["fencebench", "bench", "./solver"]).is_err());
        assert!(Cli::try_parse_from(["fencebench"]).is_err());
    }

    // Tests log level follows the quiet flag
    // Verified by inverting quiet flag logic
    #[test]
    fn test_default_log_level() {
        let cli = Cli::parse_from(["fencebench", "validate", "a.in", "a.out"]);
        assert_eq!(cli.default_log_level(), "info");
        assert!(cli.should_show_progress());

        let cli = Cli::parse_from(["fencebench", "validate", "a.in", "a.out", "--quiet"]);
        assert_eq!(cli.default_log_level(), "warn");
    }

    // Tests validate accepts only correct solutions
    // Verified by accepting every readable pair
    #[test]
    fn test_validate_files_verdicts() {
        let dir = TempDir::new().expect("temp dir");
        let instance = dir.path().join("case.in");
        let good = dir.path().join("good.out");
        let bad = dir.path().join("bad.out");
        std::fs::write(&instance, "1 3\n1 0 1\n").expect("write instance");
        std::fs::write(&good, "1 1 0 0 0 1\n1 3 0 0 1 0\n").expect("write good");
        std::fs::write(&bad, "1 1 0 0 0 1\n").expect("write bad");

        let validate = |solution: &PathBuf| {
            validate_files(&ValidateArgs {
                instance: instance.clone(),
                solution: solution.clone(),
            })
            .expect("files are readable")
        };

        assert!(validate(&good));
        assert!(!validate(&bad));

        let missing = ValidateArgs {
            instance: dir.path().join("missing.in"),
            solution: good,
        };
        assert!(validate_files(&missing).is_err());
    }

    // Tests the generate command writes numbered instances
    // Verified by numbering files from one
    #[test]
    fn test_run_generate_writes_files() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("corpus");
        let cli = Cli::parse_from([
            "fencebench".into(),
            "generate".into(),
            out.clone().into_os_string(),
            "-n".into(),
            "2".into(),
            "--quiet".into(),
        ]);

        assert!(run(cli).is_ok());
        assert!(out.join("0.in").is_file());
        assert!(out.join("1.in").is_file());
    }
}
