use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use jdoc_config::JdocConfig;
use jdoc_model::{ClassKind, TypeRef};
use jdoc_workspace::{Extractor, Severity};
use pretty_assertions::assert_eq;

/// Render a class page in the classic javadoc layout.
fn page(package: &str, name: &str, definition: &str, fields: &[&str], methods: &[&str]) -> String {
    let mut html = format!(
        "<HTML><BODY>\n<A NAME=\"navbar_top\"><!-- --></A>\n<HR>\n\
         <H2><FONT SIZE=\"-1\">{package}</FONT><BR>Class {name}</H2>\n<HR>\n\
         <DL><DT>{definition}</DL>\n<HR>\n"
    );
    if !fields.is_empty() {
        html.push_str("<A NAME=\"field_detail\"><!-- --></A>\n");
        for field in fields {
            html.push_str(&format!("<H3>field</H3>\n<PRE>{field}</PRE>\n<HR>\n"));
        }
    }
    if !methods.is_empty() {
        html.push_str("<A NAME=\"method_detail\"><!-- --></A>\n");
        for method in methods {
            html.push_str(&format!("<H3>method</H3>\n<PRE>{method}</PRE>\n<HR>\n"));
        }
    }
    html.push_str("<A NAME=\"navbar_bottom\"><!-- --></A>\n</BODY></HTML>\n");
    html
}

fn constants_page(class: &str, rows: &[(&str, &str)]) -> String {
    let mut html = format!(
        "<HTML><BODY>\n<HR>\n<TABLE BORDER=\"1\">\n<TR><TD COLSPAN=\"3\">{class}</TD></TR>\n"
    );
    for (name, value) in rows {
        html.push_str(&format!(
            "<TR><TD>public static final int</TD><TD>{name}</TD><TD>{value}</TD></TR>\n"
        ));
    }
    html.push_str("</TABLE>\n<A NAME=\"navbar_bottom\"><!-- --></A>\n</BODY></HTML>\n");
    html
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn config(roots: &[PathBuf]) -> JdocConfig {
    let mut config = JdocConfig::default();
    config.doc_roots = roots.to_vec();
    config.extraction.threads = 2;
    config
}

#[test]
fn folds_pages_of_one_class_across_roots() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("midp");
    let second = dir.path().join("midp-ext");

    write(
        &first,
        "javax/microedition/lcdui/Alert.html",
        &page(
            "javax.microedition.lcdui",
            "Alert",
            r#"public class <B>Alert</B><DT>extends <A HREF="Screen.html">Screen</A>"#,
            &["public static final int <B>FOREVER</B>"],
            &["public int <B>size</B>()"],
        ),
    );
    write(
        &first,
        "constant-values.html",
        &constants_page("javax.microedition.lcdui.Alert", &[("FOREVER", "-2")]),
    );
    write(
        &second,
        "javax/microedition/lcdui/Alert.html",
        &page(
            "javax.microedition.lcdui",
            "Alert",
            r#"public final class <B>Alert</B><DT>extends <A HREF="Screen.html">Screen</A>"#,
            &[],
            &[
                r#"public int <B>size</B>() throws <A HREF="../../../java/lang/IllegalStateException.html">IllegalStateException</A>"#,
            ],
        ),
    );

    let extraction = Extractor::new(config(&[first.clone(), second.clone()])).run().unwrap();
    let report = &extraction.report;
    assert_eq!(report.roots, 2);
    assert_eq!(report.documents_parsed, 2);
    assert_eq!(report.merges, 1);
    assert!(!report.has_errors(), "{report}");

    let alert = extraction
        .registry
        .get("javax.microedition.lcdui.Alert")
        .unwrap();
    assert_eq!(alert.kind(), ClassKind::Regular);
    assert_eq!(
        alert.parent(),
        Some(&TypeRef::new("javax.microedition.lcdui.Screen"))
    );
    assert_eq!(alert.methods().len(), 1);
    assert_eq!(
        alert.methods()[0].throws,
        BTreeSet::from([TypeRef::new("java.lang.IllegalStateException")])
    );
    assert_eq!(alert.constant("FOREVER").unwrap().value.as_deref(), Some("-2"));
    assert_eq!(alert.sources().len(), 2);
}

#[test]
fn continuable_failures_are_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a");
    let second = dir.path().join("b");

    write(
        &first,
        "p/Shape.html",
        &page("p", "Shape", "public interface <B>Shape</B>", &[], &[]),
    );
    write(
        &first,
        "p/Broken.html",
        &page("p", "Broken", "public class <B>Broken</B>", &[], &["public void <B>run</B>"]),
    );
    write(
        &first,
        "constant-values.html",
        &constants_page("p.Missing", &[("X", "1")]),
    );
    write(
        &second,
        "p/Shape.html",
        &page("p", "Shape", "public class <B>Shape</B>", &[], &[]),
    );
    write(
        &second,
        "p/Point.html",
        &page("p", "Point", "public class <B>Point</B>", &["public int <B>x</B>"], &[]),
    );
    write(
        &second,
        "constant-values.html",
        &constants_page("p.Point", &[("ORIGIN", "0")]),
    );

    let extraction = Extractor::new(config(&[first.clone(), second.clone()])).run().unwrap();
    let report = &extraction.report;
    assert_eq!(report.documents_seen, 4);
    assert_eq!(report.documents_failed, 1);
    assert_eq!(report.merge_conflicts, 1);
    assert_eq!(report.constant_mismatches, 1);
    assert!(report.has_errors());
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("p.Missing")));

    let conflict = report
        .diagnostics
        .iter()
        .find(|d| d.message.starts_with("merge conflict"))
        .unwrap();
    let kept = first.join("p/Shape.html");
    let rejected = second.join("p/Shape.html");
    assert!(
        conflict.message.contains(&kept.display().to_string()),
        "{}",
        conflict.message
    );
    assert!(
        conflict.message.contains(&rejected.display().to_string()),
        "{}",
        conflict.message
    );

    // The conflicting second page is dropped; the interface survives.
    let shape = extraction.registry.get("p.Shape").unwrap();
    assert_eq!(shape.kind(), ClassKind::Interface);
    assert!(extraction.registry.contains("p.Point"));
    assert!(!extraction.registry.contains("p.Broken"));
}

#[test]
fn missing_root_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let err = Extractor::new(config(&[dir.path().join("nope")]))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
}
