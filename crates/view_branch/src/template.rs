//! Default premium form template.

use view_dom::{Document, Node};

use crate::branch::Branch;

fn select(name: &str, selected: &str, options: &[(&str, &str)]) -> Node {
    Node::new("select")
        .name(name)
        .value(selected)
        .children(
            options
                .iter()
                .map(|(value, label)| Node::new("option").attr("value", *value).text(*label)),
        )
}

fn number(name: &str, value: &str) -> Node {
    Node::new("input").attr("type", "number").name(name).value(value)
}

fn checkbox(name: &str) -> Node {
    Node::new("input")
        .attr("type", "checkbox")
        .name(name)
        .value("on")
}

fn section(branch: Branch, fields: Vec<Node>) -> Node {
    Node::new("div")
        .id(branch.section_id())
        .class("branch-section hidden")
        .children(fields)
}

/// Premium calculation form with one section per branch.
///
/// Every section is hidden until a branch is selected.
pub fn premium_form_document() -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let options = Node::new("div").class("branch-selector").children(
        Branch::ALL.iter().map(|branch| {
            Node::new("div")
                .class("branch-option")
                .data("branch", branch.as_str())
                .text(branch.calculation_type())
        }),
    );

    let vie = section(
        Branch::Vie,
        vec![
            select(
                "coverageType",
                "deces",
                &[
                    ("deces", "Décès temporaire"),
                    ("vie_entiere", "Vie entière"),
                    ("rente", "Rente viagère"),
                ],
            ),
            number("coverageAmount", "100000"),
            number("term", "20"),
            number("interestRate", "1.5"),
        ],
    );

    let non_vie = section(
        Branch::NonVie,
        vec![
            select(
                "coverageType",
                "auto",
                &[("auto", "Automobile"), ("home", "Habitation"), ("accident", "Accident")],
            ),
            number("coverageAmount", "50000"),
            number("riskLevel", "1.0"),
            number("guaranteeLevel", "1.0"),
            checkbox("accident"),
            checkbox("theft"),
            checkbox("natural_disaster"),
        ],
    );

    let obligatoire = section(
        Branch::Obligatoire,
        vec![
            select(
                "coverageType",
                "auto_liability",
                &[
                    ("auto_liability", "RC automobile"),
                    ("health", "Santé"),
                    ("professional", "RC professionnelle"),
                ],
            ),
            number("coverageAmount", "20000"),
            number("riskCategory", "1.0"),
            number("region", "1.0"),
        ],
    );

    doc.append(
        root,
        Node::new("form")
            .id("premiumForm")
            .attr("method", "post")
            .child(options)
            .child(
                Node::new("input")
                    .id("insuranceBranch")
                    .attr("type", "hidden")
                    .name("insuranceBranch"),
            )
            .child(number("age", "40"))
            .child(select("gender", "M", &[("M", "Homme"), ("F", "Femme")]))
            .child(vie)
            .child(non_vie)
            .child(obligatoire)
            .child(
                Node::new("button")
                    .id("calculateBtn")
                    .attr("type", "submit")
                    .text("Calculer la prime"),
            ),
    );

    doc
}
