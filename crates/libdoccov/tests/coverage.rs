//! Coverage engine behaviour against in-memory modules and on-disk documentation.

mod utils;

#[cfg(test)]
mod tests {
    use std::fs;

    use libdoccov::{DocCoverage, ModuleTable, SearchPathResolver, Unrated};
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use tempfile::tempdir;

    use super::utils::{FakeLoader, analysis, module, write_docs};

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn partial_coverage_from_items() {
        let dir = tempdir().unwrap();
        let (mut analysis, _) = analysis(&dir, module(&["foo", "bar", "baz"]), "- foo\n- baz\n");

        assert_eq!(analysis.coverage(), Some(2.0 / 3.0));
        assert_eq!(analysis.naked(), vec!["bar"]);
        assert_eq!(analysis.covered(), vec!["baz", "foo"]);
    }

    #[test]
    fn single_undocumented_routine() {
        let dir = tempdir().unwrap();
        let docs = "# app\n\n## foo\n\nDoes foo.\n\n## bar\n\n## baz\n";
        let (mut analysis, _) = analysis(&dir, module(&["foo", "bar", "baz", "naked"]), docs);

        assert_eq!(analysis.coverage(), Some(0.75));
        assert_eq!(analysis.naked(), vec!["naked"]);
        assert_eq!(analysis.uncovered(), vec!["naked"]);
    }

    #[test]
    fn private_pattern_removes_routine_from_denominator() {
        let dir = tempdir().unwrap();
        let docs = "## foo\n## bar\n## baz\n";
        let (analysis, _) = analysis(&dir, module(&["foo", "bar", "baz", "naked"]), docs);
        let mut analysis = analysis.with_also_private(vec![re("^naked$")]);

        assert_eq!(analysis.coverage(), Some(1.0));
        assert!(analysis.naked().is_empty());
        assert_eq!(analysis.covered(), vec!["bar", "baz", "foo"]);
    }

    #[test]
    fn also_private_excludes_undocumented_routine() {
        let dir = tempdir().unwrap();
        let (analysis, _) = analysis(&dir, module(&["foo", "bar"]), "- foo\n");
        let mut analysis = analysis.with_also_private(vec![re("^bar$")]);

        assert_eq!(analysis.coverage(), Some(1.0));
    }

    #[test]
    fn decorated_mentions_normalize_to_the_same_name() {
        let dir = tempdir().unwrap();
        let docs = "## ->naked\n\n- <naked>\n\n### naked(x)\n";
        let (mut analysis, _) = analysis(&dir, module(&["naked", "other"]), docs);

        assert_eq!(analysis.coverage(), Some(0.5));
        assert_eq!(analysis.covered(), vec!["naked"]);
        assert_eq!(analysis.naked(), vec!["other"]);
    }

    #[test]
    fn markdown_spellings_count() {
        let dir = tempdir().unwrap();
        let docs = "\
- [`Parser::parse`]: parse a document
- `tokens`, `peek` | **reset**
#### `Lexer::next_token(input)`
";
        let names = ["parse", "tokens", "peek", "reset", "next_token"];
        let (mut analysis, _) = analysis(&dir, module(&names), docs);

        assert_eq!(analysis.coverage(), Some(1.0));
    }

    #[test]
    fn only_items_and_mid_level_headings_count() {
        let dir = tempdir().unwrap();
        let docs = "\
# foo

bar is mentioned in prose only.

##### baz

```
- qux
```
";
        let (mut analysis, _) = analysis(&dir, module(&["foo", "bar", "baz", "qux"]), docs);

        assert_eq!(analysis.coverage(), Some(0.0));
        assert_eq!(analysis.naked(), vec!["bar", "baz", "foo", "qux"]);
    }

    #[test]
    fn covered_and_naked_partition_eligible_symbols() {
        let dir = tempdir().unwrap();
        let names = ["alpha", "beta", "gamma", "delta", "_hidden"];
        let (mut analysis, _) = analysis(&dir, module(&names), "- alpha\n- gamma\n- _hidden\n");

        let rating = analysis.coverage().unwrap();
        let covered = analysis.covered();
        let naked = analysis.naked();
        let eligible: Vec<String> = analysis.symbols().unwrap().keys().cloned().collect();

        assert_eq!(eligible.len(), 4);
        assert_eq!(covered.len() + naked.len(), eligible.len());
        assert!(covered.iter().all(|name| !naked.contains(name)));
        let mut union: Vec<String> = covered.iter().chain(naked.iter()).cloned().collect();
        union.sort();
        assert_eq!(union, eligible);
        assert_eq!(rating, covered.len() as f64 / eligible.len() as f64);
    }

    #[test]
    fn imported_routines_are_never_eligible() {
        let dir = tempdir().unwrap();
        let table = ModuleTable::new("app")
            .with_local("run")
            .with_foreign("read_to_string", "std::fs")
            .with_foreign("helper", "app::util");
        let (mut analysis, _) = analysis(&dir, table, "- read_to_string\n- helper\n");

        assert_eq!(analysis.coverage(), Some(0.0));
        assert_eq!(analysis.naked(), vec!["run"]);
        assert!(analysis.covered().is_empty());
    }

    #[test]
    fn private_routines_are_never_eligible_even_when_documented() {
        let dir = tempdir().unwrap();
        let table = module(&["run", "_internal", "import", "bootstrap"]);
        let (mut analysis, _) = analysis(&dir, table, "- run\n- _internal\n- import\n");

        assert_eq!(analysis.coverage(), Some(1.0));
        assert_eq!(analysis.covered(), vec!["run"]);
    }

    #[test]
    fn replacing_private_patterns_drops_defaults() {
        let dir = tempdir().unwrap();
        let table = module(&["run", "_internal", "stop"]);
        let (analysis, _) = analysis(&dir, table, "- run\n");
        let mut analysis = analysis.with_private(vec![re("^stop$")]);

        assert_eq!(analysis.coverage(), Some(0.5));
        assert_eq!(analysis.naked(), vec!["_internal"]);
    }

    #[test]
    fn empty_symbol_set_is_unrated() {
        let dir = tempdir().unwrap();
        let (mut analysis, loader) = analysis(&dir, module(&["_private"]), "- _private\n");

        assert_eq!(analysis.coverage(), None);
        assert_eq!(analysis.why_unrated(), Some(&Unrated::EmptySymbolSet));
        assert!(analysis.covered().is_empty());
        assert!(analysis.naked().is_empty());
        // The empty result is cached; the queries do not recompute.
        assert_eq!(loader.loads(), 1);
    }

    #[test]
    fn missing_documentation_is_unrated() {
        let dir = tempdir().unwrap();
        let loader = FakeLoader::new(module(&["foo"]));
        let mut analysis = DocCoverage::new("app")
            .with_loader(loader.clone())
            .with_doc_from(dir.path().join("absent.md"));

        assert_eq!(analysis.coverage(), None);
        assert!(matches!(
            analysis.why_unrated(),
            Some(Unrated::DocumentationSourceMissing(_))
        ));
        assert_eq!(loader.loads(), 0);
        assert!(analysis.naked().is_empty());
    }

    #[test]
    fn unavailable_module_is_unrated() {
        let dir = tempdir().unwrap();
        let mut analysis = DocCoverage::new("app")
            .with_loader(FakeLoader::unavailable())
            .with_doc_from(write_docs(&dir, "- foo\n"));

        assert_eq!(analysis.coverage(), None);
        assert_eq!(
            analysis.why_unrated(),
            Some(&Unrated::ModuleUnavailable("app".to_string()))
        );
        assert!(analysis.covered().is_empty());
        assert_eq!(
            analysis.summary().report(),
            "app has no coverage rating: couldn't load module: app"
        );
    }

    #[test]
    fn queries_compute_lazily_and_reuse_the_cache() {
        let dir = tempdir().unwrap();
        let (mut analysis, loader) = analysis(&dir, module(&["foo", "bar"]), "- foo\n");

        assert!(analysis.symbols().is_none());
        let first = analysis.naked();
        let second = analysis.naked();
        assert_eq!(first, vec!["bar"]);
        assert_eq!(first, second);
        assert_eq!(analysis.covered(), vec!["foo"]);
        assert_eq!(loader.loads(), 1);
    }

    #[test]
    fn every_coverage_call_rebuilds() {
        let dir = tempdir().unwrap();
        let (mut analysis, loader) = analysis(&dir, module(&["foo", "bar"]), "- foo\n");

        assert_eq!(analysis.coverage(), Some(0.5));
        loader.replace(module(&["foo", "bar", "baz", "qux"]));
        // Cached queries still see the first computation.
        assert_eq!(analysis.naked(), vec!["bar"]);

        assert_eq!(analysis.coverage(), Some(0.25));
        assert_eq!(analysis.naked(), vec!["bar", "baz", "qux"]);
        assert_eq!(loader.loads(), 2);

        write_docs(&dir, "- foo\n- bar\n- baz\n- qux\n");
        assert_eq!(analysis.coverage(), Some(1.0));
    }

    #[test]
    fn failure_after_success_clears_the_cache() {
        let dir = tempdir().unwrap();
        let (mut analysis, _) = analysis(&dir, module(&["foo", "bar"]), "- foo\n");
        assert_eq!(analysis.coverage(), Some(0.5));

        fs::remove_file(dir.path().join("app.md")).unwrap();
        assert_eq!(analysis.coverage(), None);
        assert!(analysis.symbols().is_none());
        assert!(analysis.naked().is_empty());

        write_docs(&dir, "- foo\n- bar\n");
        assert_eq!(analysis.coverage(), Some(1.0));
        assert_eq!(analysis.why_unrated(), None);
    }

    #[test]
    fn trustme_counts_as_documented() {
        let dir = tempdir().unwrap();
        let (analysis, _) = analysis(&dir, module(&["foo", "from_str", "from_bytes"]), "- foo\n");
        let mut analysis = analysis.with_trustme(vec![re("^from_")]);

        assert_eq!(analysis.coverage(), Some(1.0));
        assert_eq!(analysis.covered(), vec!["foo", "from_bytes", "from_str"]);
    }

    #[test]
    fn documentation_found_on_search_path() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("net")).unwrap();
        fs::write(
            dir.path().join("net").join("mod.rs"),
            "//! Networking.\n//!\n//! ## connect\n\npub fn connect() {}\n/// - listen\npub fn listen() {}\n",
        )
        .unwrap();

        let table = ModuleTable::new("app::net")
            .with_local("connect")
            .with_local("listen");
        let mut analysis = DocCoverage::new("app::net")
            .with_loader(FakeLoader::new(table))
            .with_resolver(SearchPathResolver::new([dir.path()]));

        assert_eq!(analysis.coverage(), Some(0.5));
        assert_eq!(analysis.naked(), vec!["listen"]);
    }

    #[test]
    fn summary_and_report() {
        let dir = tempdir().unwrap();
        let (analysis, _) = analysis(&dir, module(&["foo", "bar", "baz"]), "- foo\n");
        let mut analysis = analysis.with_debug(true);

        let summary = analysis.summary();
        assert_eq!(summary.package, "app");
        assert_eq!(summary.rating, Some(1.0 / 3.0));
        assert_eq!(summary.covered, vec!["foo"]);
        assert_eq!(summary.uncovered, vec!["bar", "baz"]);
        assert_eq!(summary.why_unrated, None);
        assert_eq!(
            summary.report(),
            format!(
                "app has a coverage rating of {}\nThe following are uncovered: bar, baz",
                1.0 / 3.0
            )
        );
    }

    #[test]
    fn unrated_summary_report() {
        let dir = tempdir().unwrap();
        let (mut analysis, _) = analysis(&dir, module(&["_only"]), "- foo\n");

        let summary = analysis.summary();
        assert_eq!(summary.rating, None);
        assert_eq!(
            summary.report(),
            "app has no coverage rating: no public symbols defined"
        );
    }

    #[test]
    fn analyses_move_across_threads() {
        let dir = tempdir().unwrap();
        let (mut analysis, _) = analysis(&dir, module(&["foo", "bar"]), "- bar\n");
        let handle = std::thread::spawn(move || analysis.coverage());
        assert_eq!(handle.join().unwrap(), Some(0.5));
    }
}
