//! Parse/render behavior: default materialization, ordering, round-trips

use xmlmap::{parse, Field, Instance, Model, Result, Slot};

#[test]
fn test_default_rendering_nested() -> Result<()> {
    let inner = Model::new("Inner")
        .field(Field::string("name").tagname("Name").default_value("Inner"))
        .build();
    let hello = Model::new("Hello")
        .field(
            Field::string("recipient")
                .tagname("recipient")
                .default_value("Test"),
        )
        .field(Field::integer("size").tagname("size").default_value(42i64))
        .field(
            Field::string("message")
                .tagname("message")
                .default_value("Hello, world"),
        )
        .field(Field::model("inner", &inner).nested_default())
        .build();

    let expected = "<?xml version=\"1.0\" ?><Hello><recipient>Test</recipient><size>42</size><message>Hello, world</message><Inner><Name>Inner</Name></Inner></Hello>";
    assert_eq!(Instance::new(&hello).render()?, expected);
    Ok(())
}

#[test]
fn test_default_rendering_nested_no_tags() -> Result<()> {
    let inner = Model::new("Inner")
        .field(Field::string("name").default_value("Inner"))
        .build();
    let hello = Model::new("Hello")
        .field(Field::string("recipient").default_value("Test"))
        .field(Field::integer("size").default_value(42i64))
        .field(Field::string("message").default_value("Hello, world"))
        .field(Field::model("inner", &inner).nested_default())
        .build();

    let expected = "<?xml version=\"1.0\" ?><Hello recipient=\"Test\" size=\"42\" message=\"Hello, world\"><Inner name=\"Inner\" /></Hello>";
    assert_eq!(Instance::new(&hello).render()?, expected);
    Ok(())
}

#[test]
fn test_default_rendering_simple() -> Result<()> {
    let model = Model::new("SomeModel")
        .field(Field::string("name").tagname("Name").default_value("value"))
        .build();

    let expected = "<?xml version=\"1.0\" ?><SomeModel><Name>value</Name></SomeModel>";
    assert_eq!(Instance::new(&model).render()?, expected);
    Ok(())
}

#[test]
fn test_default_rendering_simple_no_tags() -> Result<()> {
    let model = Model::new("SomeModel")
        .field(Field::string("name").default_value("value"))
        .build();

    let expected = "<?xml version=\"1.0\" ?><SomeModel name=\"value\" />";
    assert_eq!(Instance::new(&model).render()?, expected);
    Ok(())
}

#[test]
fn test_default_rendering_list() -> Result<()> {
    let inner = Model::new("Inner")
        .field(Field::string("name").tagname("Name").default_value("Inner"))
        .build();
    let hello = Model::new("Hello")
        .field(Field::list("inner", Field::model("inner", &inner)).nested_defaults(1))
        .build();

    let expected = "<?xml version=\"1.0\" ?><Hello><Inner><Name>Inner</Name></Inner></Hello>";
    assert_eq!(Instance::new(&hello).render()?, expected);
    Ok(())
}

#[test]
fn test_list_parse_order() -> Result<()> {
    let inner = Model::new("Inner")
        .field(Field::string("name").tagname("Name"))
        .build();
    let hello = Model::new("Hello")
        .field(Field::list("inner", Field::model("inner", &inner)))
        .field(Field::string("val").tagname("Val"))
        .build();

    let input = "<?xml version=\"1.0\" ?><Hello><Inner><Name>Inner</Name></Inner><Inner><Name>Inner</Name></Inner><Val>Test</Val></Hello>";
    let result = parse(&hello, input)?;
    assert_eq!(result.render()?, input);
    Ok(())
}

#[test]
fn test_list_parse_out_of_order() -> Result<()> {
    let inner = Model::new("Inner")
        .field(Field::string("name").tagname("Name"))
        .build();
    let hello = Model::new("Hello")
        .order_sensitive(false)
        .field(Field::list("inner", Field::model("inner", &inner)))
        .field(Field::string("val").tagname("Val"))
        .build();

    let input = "<?xml version=\"1.0\" ?><Hello><Inner><Name>Inner</Name></Inner><Val>Test</Val><Inner><Name>Inner</Name></Inner></Hello>";
    let expected = "<?xml version=\"1.0\" ?><Hello><Inner><Name>Inner</Name></Inner><Inner><Name>Inner</Name></Inner><Val>Test</Val></Hello>";

    let result = parse(&hello, input)?;
    assert_eq!(result.render()?, expected);
    Ok(())
}

#[test]
fn test_interleaved_round_trip_preserved() -> Result<()> {
    // same document as the out-of-order case, but order-sensitive:
    // the original interleaving must come back verbatim
    let inner = Model::new("Inner")
        .field(Field::string("name").tagname("Name"))
        .build();
    let hello = Model::new("Hello")
        .field(Field::list("inner", Field::model("inner", &inner)))
        .field(Field::string("val").tagname("Val"))
        .build();

    let input = "<?xml version=\"1.0\" ?><Hello><Inner><Name>Inner</Name></Inner><Val>Test</Val><Inner><Name>Inner</Name></Inner></Hello>";
    let result = parse(&hello, input)?;
    assert_eq!(result.render()?, input);
    Ok(())
}

#[test]
fn test_attribute_round_trip() -> Result<()> {
    let model = Model::new("M")
        .field(Field::string("name"))
        .field(Field::integer("size").attribute("Size"))
        .field(Field::boolean("flag").tagname("Flag"))
        .build();

    let input = "<?xml version=\"1.0\" ?><M name=\"x\" Size=\"7\"><Flag>false</Flag></M>";
    let result = parse(&model, input)?;
    assert_eq!(result.get("size").and_then(Slot::as_int), Some(7));
    assert_eq!(result.get("flag").and_then(Slot::as_bool), Some(false));
    assert_eq!(result.render()?, input);
    Ok(())
}

#[test]
fn test_parsed_values_survive_mutation() -> Result<()> {
    let model = Model::new("M")
        .field(Field::string("val").tagname("Val"))
        .build();
    let mut instance = parse(
        &model,
        "<?xml version=\"1.0\" ?><M><Val>old</Val></M>",
    )?;
    instance.set("val", "new")?;
    assert_eq!(
        instance.render()?,
        "<?xml version=\"1.0\" ?><M><Val>new</Val></M>"
    );
    Ok(())
}

#[test]
fn test_render_json() -> Result<()> {
    let inner = Model::new("Inner")
        .field(
            Field::string("name")
                .tagname("Name")
                .default_value("test_name"),
        )
        .build();
    let hello = Model::new("Hello")
        .field(Field::list("inner", Field::model("inner", &inner)).nested_defaults(2))
        .field(Field::string("val").tagname("Val").default_value("test_val"))
        .build();

    let result = Instance::new(&hello).render_json(true, true)?;
    let expected =
        "{\"Hello\": {\"inner\": [{\"name\": \"test_name\"}, {\"name\": \"test_name\"}], \"val\": \"test_val\"}}";
    assert_eq!(result, expected);
    Ok(())
}

#[test]
fn test_render_json_with_single_lists() -> Result<()> {
    let inner = Model::new("Inner")
        .field(
            Field::string("name")
                .tagname("Name")
                .default_value("test_name"),
        )
        .build();
    let hello = Model::new("Hello")
        .field(Field::list("inner", Field::model("inner", &inner)).nested_defaults(1))
        .field(Field::string("val").tagname("Val").default_value("test_val"))
        .build();

    let result = Instance::new(&hello).render_json(true, true)?;
    let expected = "{\"Hello\": {\"inner\": [{\"name\": \"test_name\"}], \"val\": \"test_val\"}}";
    assert_eq!(result, expected);
    Ok(())
}

#[test]
fn test_render_json_typed_values() -> Result<()> {
    let model = Model::new("M")
        .field(Field::integer("size").tagname("Size"))
        .field(Field::float("amount").tagname("Amount"))
        .field(Field::boolean("enabled").tagname("Enabled"))
        .build();
    let mut instance = Instance::new(&model);
    instance.set("size", 42i64)?;
    instance.set("amount", 240.45)?;
    instance.set("enabled", true)?;

    assert_eq!(
        instance.render_json(true, true)?,
        "{\"M\": {\"size\": 42, \"amount\": 240.45, \"enabled\": true}}"
    );
    Ok(())
}

#[test]
fn test_parse_failure_returns_no_instance() {
    let model = Model::new("Hello")
        .field(Field::string("a").tagname("A"))
        .field(Field::string("b").tagname("B"))
        .build();
    // first field parses fine; the second is missing, and the whole
    // parse fails rather than yielding a partial instance
    let err = parse(&model, "<?xml version=\"1.0\" ?><Hello><A>x</A></Hello>").unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("Hello.b"));
}
