//! Tests for solver execution, output placement and per-case evaluation

#[cfg(test)]
mod tests {
    use fencebench::FenceError;
    use fencebench::io::harness::{
        BenchmarkConfig, BenchmarkRunner, build_solver, evaluate_case, output_dir_for,
        output_path_for, verdict_label,
    };
    use fencebench::io::report::read_report;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const CAT: &str = "/bin/cat";
    const ONE_ROW: &str = "1 3\n1 0 1\n";

    #[cfg(unix)]
    fn solver_script(dir: &Path, body: &str) -> PathBuf {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("solver.sh");
        let mut file = std::fs::File::create(&path).expect("create script");
        writeln!(file, "#!/bin/sh\ncat > /dev/null\n{body}").expect("write script");
        file.sync_all().expect("sync script");
        drop(file);

        let mut permissions = std::fs::metadata(&path).expect("metadata").permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).expect("chmod");
        path
    }

    // Tests outputs keep the instance stem with the output extension
    // Verified by appending the extension to the full file name
    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("data/small/7.in"), Path::new("out/small")),
            PathBuf::from("out/small/7.out")
        );
    }

    // Tests outputs are grouped by input directory name
    // Verified by joining the full input path
    #[test]
    fn test_output_dir_for() {
        assert_eq!(
            output_dir_for(Path::new("data/small"), Path::new("data/output")),
            PathBuf::from("data/output/small")
        );
        assert_eq!(
            output_dir_for(Path::new("/"), Path::new("data/output")),
            PathBuf::from("data/output")
        );
    }

    // Tests the verdict text of each outcome
    // Verified by swapping the labels
    #[test]
    fn test_verdict_label() {
        assert_eq!(verdict_label(true), "Accepted");
        assert_eq!(verdict_label(false), "Wrong Answer");
    }

    // Tests build failures abort with the command and status
    // Verified by ignoring the build exit status
    #[test]
    fn test_build_solver_outcomes() {
        assert!(build_solver("true").is_ok());
        assert!(matches!(
            build_solver("false"),
            Err(FenceError::SolverBuild {
                status: Some(1),
                ..
            })
        ));
        assert!(matches!(
            build_solver("   "),
            Err(FenceError::InvalidParameter { .. })
        ));
        assert!(matches!(
            build_solver("/nonexistent/fencebench-build"),
            Err(FenceError::SolverBuild {
                status: Some(127),
                ..
            })
        ));
    }

    // Tests the build command is interpreted by the shell
    // Verified by splitting the command on whitespace
    #[test]
    fn test_build_solver_uses_shell() {
        assert!(matches!(
            build_solver("true && false"),
            Err(FenceError::SolverBuild {
                status: Some(1),
                ..
            })
        ));
        assert!(build_solver("false || true").is_ok());

        let dir = TempDir::new().expect("temp dir");
        let marker = dir.path().join("built");
        build_solver(&format!("echo ok > '{}'", marker.display())).expect("build runs");
        assert_eq!(
            std::fs::read_to_string(&marker).expect("marker written"),
            "ok\n"
        );
    }

    // Tests a nonzero exit is recorded without affecting acceptance
    // Verified by rejecting every unsuccessful exit
    #[cfg(unix)]
    #[test]
    fn test_evaluate_case_nonzero_exit_still_accepted() {
        let dir = TempDir::new().expect("temp dir");
        let input = dir.path().join("0.in");
        std::fs::write(&input, ONE_ROW).expect("write instance");
        let solver = solver_script(dir.path(), "printf '1 1 0 0 0 1\\n1 3 0 0 1 0\\n'\nexit 3");

        let record =
            evaluate_case(&solver, &input, &dir.path().join("0.out")).expect("case runs");

        assert!(record.correct, "{record:?}");
        assert_eq!(record.exit_code, Some(3));
    }

    // Tests output that is not UTF-8 is recorded as a wrong answer
    // Verified by reading the output as strict UTF-8
    #[cfg(unix)]
    #[test]
    fn test_runner_survives_binary_output() {
        let dir = TempDir::new().expect("temp dir");
        let input_dir = dir.path().join("cases");
        std::fs::create_dir(&input_dir).expect("mkdir");
        for name in ["0.in", "1.in"] {
            std::fs::write(input_dir.join(name), ONE_ROW).expect("write instance");
        }
        let solver = solver_script(dir.path(), "printf '\\377\\376garbage\\n'");

        let config = BenchmarkConfig {
            solver,
            build: None,
            input_dirs: vec![input_dir],
            output_root: dir.path().join("output"),
            report_dir: dir.path().join("log"),
        };
        let report = BenchmarkRunner::new(config, true)
            .run_and_report()
            .expect("benchmark runs");

        let records = read_report(&report).expect("report parses");
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(!record.correct);
            assert_eq!(record.exit_code, Some(0));
            assert!(record.output.ends_with("garbage\n"), "{record:?}");
            assert!(record.output.contains('\u{FFFD}'));
        }
    }

    // Tests a solver echoing its input is recorded but not accepted
    // Verified by accepting any output with a zero exit code
    #[test]
    fn test_evaluate_case_records_output() {
        let dir = TempDir::new().expect("temp dir");
        let input = dir.path().join("0.in");
        let output = dir.path().join("0.out");
        std::fs::write(&input, ONE_ROW).expect("write instance");

        let record = evaluate_case(Path::new(CAT), &input, &output).expect("case runs");

        assert_eq!(record.output, ONE_ROW);
        assert_eq!(record.exit_code, Some(0));
        assert!(!record.correct);
        assert!(record.elapsed_time >= 0.0);
        assert_eq!(record.output_file, output.display().to_string());
        assert_eq!(
            std::fs::read_to_string(&output).expect("output file"),
            record.output
        );
    }

    // Tests a malformed instance is recorded as incorrect without aborting
    // Verified by propagating the instance error
    #[test]
    fn test_evaluate_case_malformed_instance() {
        let dir = TempDir::new().expect("temp dir");
        let input = dir.path().join("bad.in");
        std::fs::write(&input, "not a grid").expect("write instance");

        let record =
            evaluate_case(Path::new(CAT), &input, &dir.path().join("bad.out")).expect("case runs");

        assert!(!record.correct);
    }

    // Tests a solver that cannot start aborts the case
    // Verified by recording a launch failure as wrong answer
    #[test]
    fn test_evaluate_case_missing_solver() {
        let dir = TempDir::new().expect("temp dir");
        let input = dir.path().join("0.in");
        std::fs::write(&input, ONE_ROW).expect("write instance");

        let result = evaluate_case(
            Path::new("/nonexistent/fencebench-solver"),
            &input,
            &dir.path().join("0.out"),
        );
        assert!(matches!(result, Err(FenceError::SolverLaunch { .. })));
    }

    // Tests the runner walks every directory and writes outputs and report
    // Verified by writing all outputs into the output root
    #[test]
    fn test_runner_writes_outputs_and_report() {
        let dir = TempDir::new().expect("temp dir");
        let small = dir.path().join("small");
        let large = dir.path().join("large");
        for (input_dir, names) in [(&small, ["0.in", "1.in"]), (&large, ["5.in", "9.in"])] {
            std::fs::create_dir(input_dir).expect("mkdir");
            for name in names {
                std::fs::write(input_dir.join(name), ONE_ROW).expect("write instance");
            }
        }

        let config = BenchmarkConfig {
            solver: PathBuf::from(CAT),
            build: None,
            input_dirs: vec![small, large],
            output_root: dir.path().join("output"),
            report_dir: dir.path().join("log"),
        };
        let mut runner = BenchmarkRunner::new(config, true);

        let report = runner.run_and_report().expect("benchmark runs");

        assert!(dir.path().join("output/small/0.out").is_file());
        assert!(dir.path().join("output/small/1.out").is_file());
        assert!(dir.path().join("output/large/5.out").is_file());
        assert!(dir.path().join("output/large/9.out").is_file());

        let records = read_report(&report).expect("report parses");
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|record| !record.correct));
        assert!(records.first().is_some_and(|record| record.input_file.ends_with("0.in")));
        assert!(records.last().is_some_and(|record| record.input_file.ends_with("9.in")));
    }

    // Tests a failing build aborts before any case runs
    // Verified by running cases after a failed build
    #[test]
    fn test_runner_aborts_on_build_failure() {
        let dir = TempDir::new().expect("temp dir");
        let input_dir = dir.path().join("cases");
        std::fs::create_dir(&input_dir).expect("mkdir");
        std::fs::write(input_dir.join("0.in"), ONE_ROW).expect("write instance");

        let config = BenchmarkConfig {
            solver: PathBuf::from(CAT),
            build: Some("false".to_string()),
            input_dirs: vec![input_dir],
            output_root: dir.path().join("output"),
            report_dir: dir.path().join("log"),
        };

        let result = BenchmarkRunner::new(config, true).run();

        assert!(matches!(result, Err(FenceError::SolverBuild { .. })));
        assert!(!dir.path().join("output").exists());
    }
}
