use morph_ast::SwiftType;
use morph_rewriter::{RewriteSummary, Rewriter, RewriterConfig};

const HEADER: &str = "\
#define COUNT 10
#define RATIO COUNT * 1.5
#define GREETING @\"hi\"
#define MAX(a, b) ((a) > (b) ? (a) : (b))

@interface MyClass : NSObject
@property (nonatomic) BOOL value;
- (BOOL)value;
- (void)setValue:(BOOL)value;
- (void)doWork;
@end
";

fn rewrite(config: RewriterConfig) -> (Rewriter, RewriteSummary) {
    let mut rewriter = Rewriter::new(config);
    assert!(rewriter.add_header("Main.h", HEADER));
    let summary = rewriter.run();
    (rewriter, summary)
}

#[test]
fn folds_macros_and_merges_accessors() {
    let (rewriter, summary) = rewrite(RewriterConfig::default());
    assert_eq!(
        summary,
        RewriteSummary {
            files: 1,
            merged_accessors: 2,
            removed_extensions: 0,
            converted_directives: 3,
            typed_initializers: 3,
            history: None,
        }
    );

    let intentions = rewriter.intentions().read();
    let file = intentions.intention_for("Main.h").unwrap();
    assert_eq!(file.target_path, "Main.swift");

    let constants: Vec<_> = file
        .global_variables()
        .iter()
        .map(|var| (var.name.as_str(), var.storage.ty.clone(), var.storage.is_constant))
        .collect();
    assert_eq!(
        constants,
        vec![
            ("COUNT", SwiftType::int(), true),
            ("RATIO", SwiftType::double(), true),
            ("GREETING", SwiftType::string(), true),
        ]
    );
    assert_eq!(
        file.global_variable("RATIO").unwrap().initial_value_type,
        Some(SwiftType::double())
    );

    let class = &file.type_intentions()[0];
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name(), "doWork");
    assert!(class.property("value").unwrap().has_merged_accessors);
}

#[test]
fn directive_history_names_its_source_line() {
    let (rewriter, _) = rewrite(RewriterConfig::default());
    let intentions = rewriter.intentions().read();
    let greeting = intentions
        .intention_for("Main.h")
        .unwrap()
        .global_variable("GREETING")
        .unwrap();
    assert_eq!(
        greeting.history.summary(),
        "[PreprocessorDirectiveConverter] Converted from directive `#define GREETING @\"hi\"` at Main.h line 3"
    );
}

#[test]
fn disabled_passes_leave_accessors() {
    let mut config = RewriterConfig::default();
    config.passes.property_merge = false;
    let (rewriter, summary) = rewrite(config);
    assert_eq!(summary.merged_accessors, 0);

    let intentions = rewriter.intentions().read();
    assert_eq!(intentions.class_intentions()[0].methods.len(), 3);
}

#[test]
fn history_report_when_requested() {
    let config = RewriterConfig {
        print_intention_history: true,
        ..RewriterConfig::default()
    };
    let (_, summary) = rewrite(config);
    let history = summary.history.unwrap();
    assert!(history.starts_with("Main.swift:\n"));
    assert!(history.contains("  MyClass:\n    [Creation] Main.h line 6 column 1\n"));
    assert!(history.contains(
        "[PropertyMergePass] Merged MyClass.value() -> Bool and MyClass.setValue(_ value: Bool) into property MyClass.value: Bool"
    ));
    assert!(history.contains("Converted from directive `#define COUNT 10` at Main.h line 1"));
}

#[test]
fn syntax_errors_are_diagnosed_per_file() {
    let mut rewriter = Rewriter::new(RewriterConfig::default());
    assert!(rewriter.add_header("Main.h", HEADER));
    assert!(!rewriter.add_header(
        "Broken.h",
        "@interface A\n@property int x;\nint y;\n- (void)run;\n@property BOOL z;\n@end"
    ));

    let diagnostics = rewriter.diagnostics();
    assert_eq!(diagnostics.for_origin("Broken.h").len(), 1);
    assert!(diagnostics.for_origin("Main.h").is_empty());

    let summary = rewriter.run();
    assert_eq!(summary.files, 2);
    let intentions = rewriter.intentions().read();
    let broken = intentions.type_intentions_named("A");
    assert_eq!(broken[0].properties.len(), 2);
    assert_eq!(broken[0].methods.len(), 1);
}

#[test]
fn constants_from_other_headers_are_visible() {
    let mut rewriter = Rewriter::new(RewriterConfig::default());
    rewriter.add_header("Limits.h", "#define LIMIT 4\n");
    rewriter.add_header("Uses.h", "#define DOUBLE_LIMIT LIMIT * 2\n");
    let summary = rewriter.run();
    assert_eq!(summary.converted_directives, 2);

    let intentions = rewriter.intentions().read();
    let uses = intentions.intention_for("Uses.h").unwrap();
    assert_eq!(
        uses.global_variable("DOUBLE_LIMIT").unwrap().storage.ty,
        SwiftType::int()
    );
}
