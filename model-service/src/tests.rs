//! End-to-end tests: train, persist, reload, predict

#[cfg(test)]
mod pipeline_tests {
    use std::fs;

    use crate::artifacts::{ArtifactPaths, ArtifactSet};
    use crate::config::TrainConfig;
    use crate::dataset::{read_records, TicketRecord, UNKNOWN_CATEGORY};
    use crate::error::ModelError;
    use crate::forest::ForestConfig;
    use crate::predictor::Predictor;
    use crate::trainer::{self, train};

    const DATA: &str = "\
taskTitle,taskDetails,taskCompleted,taskTodos,category,assignedEmployee
Login broken,login fails with 500 from auth service,True,\"check logs,fix token\",Backend,alice
Auth timeout,auth service times out on login,False,retry,Backend,alice
Token expiry,session token expires too early,1,,Backend,alice
DB migration,database migration fails on deploy,0,\"rollback,patch\",Backend,alice
Button color,submit button has the wrong color,True,css,Frontend,bob
Layout shift,page layout shifts on mobile,False,\"css,test\",Frontend,bob
Font size,heading font size too small,1,,Frontend,bob
Modal close,modal dialog does not close,0,js,Frontend,bob
Crash report,app crashes on startup,True,,,carol
Memory leak,memory grows without bound,False,\"profile,fix\",,carol
";

    fn config() -> TrainConfig {
        TrainConfig {
            forest: ForestConfig { n_estimators: 20, ..ForestConfig::default() },
            ..TrainConfig::default()
        }
    }

    fn record(title: &str, details: &str, category: &str, employee: &str) -> TicketRecord {
        TicketRecord {
            title: title.to_string(),
            details: details.to_string(),
            completed: false,
            todos: String::new(),
            category: category.to_string(),
            assigned_employee: employee.to_string(),
        }
    }

    fn trained_predictor() -> Predictor {
        let records = read_records(DATA.as_bytes()).unwrap();
        let (artifacts, _) = train(&records, &config()).unwrap();
        Predictor::from_artifacts(artifacts).unwrap()
    }

    #[test]
    fn test_two_row_dataset() {
        let records = vec![
            record("Login bug", "login fails", "Backend", "alice"),
            record("Color bug", "button is red", "Frontend", "bob"),
        ];
        let (artifacts, report) = train(&records, &config()).unwrap();

        assert_eq!(artifacts.developer_encoder.classes(), ["alice", "bob"]);
        assert_eq!(report.developers, 2);
        assert_eq!((report.train_rows, report.test_rows), (1, 1));
        assert!(report.accuracy.is_some());
    }

    #[test]
    fn test_category_vocabulary_has_unknown() {
        let records = read_records(DATA.as_bytes()).unwrap();
        let (artifacts, report) = train(&records, &config()).unwrap();

        assert_eq!(artifacts.category_encoder.classes(), ["Backend", "Frontend", UNKNOWN_CATEGORY]);
        assert_eq!(report.categories, 3);

        let only_known = vec![
            record("Login bug", "login fails", "Backend", "alice"),
            record("Color bug", "button is red", "Backend", "bob"),
        ];
        let (artifacts, _) = train(&only_known, &config()).unwrap();
        assert!(artifacts.category_encoder.contains(UNKNOWN_CATEGORY));
    }

    #[test]
    fn test_developer_round_trip() {
        let records = read_records(DATA.as_bytes()).unwrap();
        let (artifacts, _) = train(&records, &config()).unwrap();

        for r in &records {
            let id = artifacts.developer_encoder.transform(&r.assigned_employee).unwrap();
            assert_eq!(artifacts.developer_encoder.inverse_transform(id).unwrap(), r.assigned_employee);
        }
    }

    #[test]
    fn test_predict_known_category() {
        let predictor = trained_predictor();
        let developer = predictor.predict("login fails", "Backend").unwrap();
        assert!(predictor.developers().contains(&developer));
    }

    #[test]
    fn test_predict_unknown_category() {
        let predictor = trained_predictor();
        assert_eq!(predictor.resolve_category("Mobile"), UNKNOWN_CATEGORY);
        assert_eq!(predictor.resolve_category("Backend"), "Backend");

        let developer = predictor.predict("app crashes", "Mobile").unwrap();
        assert!(predictor.developers().contains(&developer));

        let developer = predictor.predict("", "").unwrap();
        assert!(predictor.developers().contains(&developer));
    }

    #[test]
    fn test_predict_deterministic() {
        let predictor = trained_predictor();
        let first = predictor.predict("memory grows on startup", "Frontend").unwrap();
        let second = predictor.predict("memory grows on startup", "Frontend").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("data.csv");
        fs::write(&data_path, DATA).unwrap();

        let config = TrainConfig {
            data_path,
            artifact_dir: dir.path().join("artifacts"),
            ..config()
        };
        let report = trainer::run(&config).unwrap();
        assert_eq!(report.rows, 10);
        assert_eq!(report.test_rows, 2);

        let paths = ArtifactPaths::new(&config.artifact_dir);
        for file in [paths.model(), paths.vectorizer(), paths.category_encoder(), paths.developer_encoder()] {
            assert!(file.exists(), "missing {}", file.display());
        }

        let in_memory = trained_predictor();
        let loaded = Predictor::load(&paths).unwrap();
        assert_eq!(loaded.info().features, report.features);
        assert_eq!(
            loaded.predict("login fails", "Backend").unwrap(),
            in_memory.predict("login fails", "Backend").unwrap()
        );
    }

    #[test]
    fn test_mixed_artifacts_rejected() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        let records = read_records(DATA.as_bytes()).unwrap();
        let (artifacts, _) = train(&records, &config()).unwrap();
        artifacts.save(&ArtifactPaths::new(dir_a.path())).unwrap();

        let other = vec![
            record("Other", "something else entirely", "Ops", "dave"),
            record("Again", "different words here", "Ops", "erin"),
        ];
        let (artifacts, _) = train(&other, &config()).unwrap();
        artifacts.save(&ArtifactPaths::new(dir_b.path())).unwrap();

        // Swap in a vectorizer from another training run
        fs::copy(
            ArtifactPaths::new(dir_b.path()).vectorizer(),
            ArtifactPaths::new(dir_a.path()).vectorizer(),
        )
        .unwrap();

        assert!(matches!(
            ArtifactSet::load(&ArtifactPaths::new(dir_a.path())),
            Err(ModelError::LayoutMismatch { .. })
        ));
    }
}
