//! Schema generator: emission shape, naming, and duplicate folding

use xmlmap::{generate, Result};

#[test]
fn test_generator_standard() -> Result<()> {
    let input = r#"<?xml version="1.0" encoding="utf-8"?>
<BLOCK>
    <PersonDetails>
        <PersonName>Jim</PersonName>
        <Address>
            <Street>101 Road</Street>
        </Address>
        <PersonAge>42</PersonAge>
    </PersonDetails>
    <Amount>240.45</Amount>
    <Enabled>true</Enabled>
</BLOCK>
"#;

    let expected = r#"use xmlmap::{Field, Model};

let address = Model::new("Address")
    .field(Field::string("street").tagname("Street"))
    .build();

let person_details = Model::new("PersonDetails")
    .field(Field::string("person_name").tagname("PersonName"))
    .field(Field::integer("person_age").tagname("PersonAge"))
    .field(Field::model("address", &address))
    .build();

let block = Model::new("Block")
    .tagname("BLOCK")
    .field(Field::float("amount").tagname("Amount"))
    .field(Field::boolean("enabled").tagname("Enabled"))
    .field(Field::model("person_details", &person_details))
    .build();
"#;

    assert_eq!(generate(input)?, expected);
    Ok(())
}

#[test]
fn test_generator_custom_name() -> Result<()> {
    let input = r#"<?xml version="1.0" encoding="utf-8"?>
<BLOCK>
    <person_details>
        <person_name>Jim</person_name>
        <Address>
            <Street>101 Road</Street>
        </Address>
        <PersonAge>42</PersonAge>
    </person_details>
    <Amount>240.45</Amount>
</BLOCK>
"#;

    let expected = r#"use xmlmap::{Field, Model};

let address = Model::new("Address")
    .field(Field::string("street").tagname("Street"))
    .build();

let person_details = Model::new("PersonDetails")
    .tagname("person_details")
    .field(Field::string("person_name").element())
    .field(Field::integer("person_age").tagname("PersonAge"))
    .field(Field::model("address", &address))
    .build();

let block = Model::new("Block")
    .tagname("BLOCK")
    .field(Field::float("amount").tagname("Amount"))
    .field(Field::model("person_details", &person_details))
    .build();
"#;

    assert_eq!(generate(input)?, expected);
    Ok(())
}

#[test]
fn test_generator_duplicates() -> Result<()> {
    let input = r#"<?xml version="1.0" encoding="utf-8"?>
<BLOCK>
    <Details>
        <Name>Jim</Name>
    </Details>
    <Company>
        <Details>
            <Name>Jim</Name>
        </Details>
        <Other>
            <Misc>Unknown</Misc>
        </Other>
    </Company>
</BLOCK>"#;

    let expected = r#"use xmlmap::{Field, Model};

let details = Model::new("Details")
    .field(Field::string("name").tagname("Name"))
    .build();

let other = Model::new("Other")
    .field(Field::string("misc").tagname("Misc"))
    .build();

let company = Model::new("Company")
    .field(Field::model("details", &details))
    .field(Field::model("other", &other))
    .build();

let block = Model::new("Block")
    .tagname("BLOCK")
    .field(Field::model("details", &details))
    .field(Field::model("company", &company))
    .build();
"#;

    assert_eq!(generate(input)?, expected);
    Ok(())
}

#[test]
fn test_generator_repeated_tags_become_lists() -> Result<()> {
    let input = "<Order><Item>1</Item><Item>2</Item><Note>hi</Note></Order>";
    let source = generate(input)?;
    assert!(source.contains("Field::list(\"item\", Field::integer(\"item\").tagname(\"Item\"))"));
    assert!(source.contains("Field::string(\"note\").tagname(\"Note\")"));
    Ok(())
}

#[test]
fn test_generator_rejects_malformed_input() {
    assert!(generate("<Broken><Oops></Broken>").is_err());
}
