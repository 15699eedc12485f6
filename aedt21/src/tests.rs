// Std-Lib
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Local Imports
use crate::kinds::{create_pin_group, padstack_append_layer, padstack_layer_sizes, rename_definition};
use crate::utils::{EnumStr, Ptr, SerdeFile, SerializationFormat};
use crate::*;

/// Install the test logger, if not already done
fn logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small board: three components, their pins, nets, layers and definitions
fn board() -> AedtResult<MemoryContext> {
    use EntityKind::*;
    MemoryContext::new()
        .with(Component, "U1", args!["NAME:U1", "PartName:=", "MCU", "Placement:=", "Top"])?
        .with(Component, "U2", args!["NAME:U2", "PartName:=", "FLASH", "Placement:=", "Top"])?
        .with(Component, "R1", args!["NAME:R1", "PartName:=", "RES_0402", "Value:=", "10ohm"])?
        .with(
            Pin,
            "U1-1",
            args!["NAME:U1-1", "Net:=", "GND", "Start Layer:=", "TOP", "Stop Layer:=", "TOP"],
        )?
        .with(
            Pin,
            "U1-2",
            args!["NAME:U1-2", "Net:=", "VDD", "Start Layer:=", "TOP", "Stop Layer:=", "BOTTOM"],
        )?
        .with(
            Pin,
            "R1-1",
            args!["NAME:R1-1", "Net:=", "VDD", "Start Layer:=", "TOP", "Stop Layer:=", "TOP"],
        )?
        .with(Net, "GND", args!["NAME:GND"])?
        .with(Net, "VDD", args!["NAME:VDD"])?
        .with(Net, "DQ0", args!["NAME:DQ0"])?
        .with(Layer, "TOP", args!["NAME:TOP", "Type:=", "signal", "Thickness:=", "0.035"])?
        .with(Layer, "BOTTOM", args!["NAME:BOTTOM", "Type:=", "signal", "Thickness:=", "35um"])?
        .with(Padstack, "via8", via8())?
        .with(ComponentDef, "MCU", args!["NAME:MCU", "Info:=", ["Type:=", 0, "Manufacturer:=", ""]])
}

/// A single-layer through-hole padstack
fn via8() -> Vec<Arg> {
    args![
        "NAME:via8",
        "ModTime:=",
        0,
        "Library:=",
        "",
        "ppl:=",
        [],
        "psd:=",
        [
            "nam:=",
            "via8",
            "lib:=",
            "",
            "mat:=",
            "copper",
            "plt:=",
            "0",
            [
                "NAME:pds",
                [
                    "NAME:lgm",
                    "lay:=",
                    "TOP",
                    "id:=",
                    0,
                    "pad:=",
                    ["shp:=", "Cir", "Szs:=", ["16mil"], "X:=", "0mil", "Y:=", "0mil", "R:=", "0deg"],
                    "ant:=",
                    ["shp:=", "Cir", "Szs:=", ["24mil"], "X:=", "0mil", "Y:=", "0mil", "R:=", "0deg"],
                    "thm:=",
                    ["shp:=", "No", "Szs:=", [], "X:=", "0mil", "Y:=", "0mil", "R:=", "0deg"]
                ]
            ],
            "hle:=",
            ["shp:=", "Cir", "Szs:=", ["8mil"], "X:=", "0mil", "Y:=", "0mil", "R:=", "0deg"]
        ]
    ]
}

/// Context wrapper counting enumerations, and failing a set number of fetches
#[derive(Default)]
struct Instrumented {
    inner: MemoryContext,
    enumerations: AtomicUsize,
    failures: AtomicUsize,
}
impl Instrumented {
    fn new(inner: MemoryContext) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }
    fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }
    fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }
}
impl Context for Instrumented {
    fn fetch(&self, kind: EntityKind, name: &str) -> AedtResult<Vec<Arg>> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AedtError::external(kind.to_str(), name, "flaky"));
        }
        self.inner.fetch(kind, name)
    }
    fn submit(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()> {
        self.inner.submit(kind, name, args)
    }
    fn enumerate(&self, kind: EntityKind) -> AedtResult<Vec<String>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        self.inner.enumerate(kind)
    }
    fn create(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()> {
        self.inner.create(kind, name, args)
    }
    fn delete(&self, kind: EntityKind, name: &str) -> AedtResult<()> {
        self.inner.delete(kind, name)
    }
}

/// Names of `entities`
fn names(entities: &[Ptr<Entity>]) -> AedtResult<Vec<String>> {
    let mut names = Vec::new();
    for e in entities {
        names.push(e.read()?.name().to_string());
    }
    Ok(names)
}

#[test]
fn box_scenario() -> AedtResult<()> {
    // Decode, edit, and re-encode a small named sequence
    let seq = decode(&args!["NAME:Box", "w:=", "10mil", "h:=", "5mil"])?;
    assert_eq!(seq.get("w"), Some(&Node::from(Quantity::new(10.0, Unit::Mil))));
    let mut map = KeyMap::from_seq(seq);
    map.set("w", "20mil")?;
    assert_eq!(
        encode(map.root()),
        args!["NAME:Box", "w:=", "20mil", "h:=", "5mil"]
    );
    Ok(())
}
#[test]
fn box_scenario_through_context() -> AedtResult<()> {
    // Same edit, on a write-through definition
    logging();
    let ctx = Arc::new(MemoryContext::new().with(
        EntityKind::ComponentDef,
        "Box",
        args!["NAME:Box", "w:=", "10mil", "h:=", "5mil"],
    )?);
    let mut session = Session::new(ctx.clone());
    let b = session.component_defs().lookup("box")?;
    b.write()?.set("w", "20mil")?;
    assert_eq!(
        ctx.fetch(EntityKind::ComponentDef, "Box")?,
        args!["NAME:Box", "w:=", "20mil", "h:=", "5mil"]
    );
    Ok(())
}
#[test]
fn round_trips() -> AedtResult<()> {
    // Array => tree => array
    let a = via8();
    let tree = decode(&a)?;
    assert_eq!(encode(&tree), a);
    // Tree => array => tree
    let mut t = Seq::named("t");
    t.push_pair("n", 3);
    t.push_pair("x", 2.5);
    t.push_pair("b", false);
    t.push_pair("q", Quantity::new(1.5, Unit::Mm));
    t.push(Seq::from_items(vec![Node::from("a"), Node::from("b")]));
    t.push(Seq::named("empty"));
    assert_eq!(decode(&encode(&t))?, t);
    Ok(())
}
#[test]
fn path_resolution() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let via = session.padstacks().lookup("via8")?;
    let mut via = via.write()?;
    let whole = via.get("psd/hle/Szs")?;
    let part = via.get("psd")?;
    assert_eq!(Some(&whole), part.get("hle/Szs"));
    assert_eq!(via.get("psd\\pds\\lgm\\lay")?.as_str(), Some("TOP"));
    assert!(matches!(via.get("psd/nope"), Err(AedtError::KeyNotFound { .. })));
    Ok(())
}
#[test]
fn case_insensitive_uniqueness() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let net = session.nets().lookup("VDD")?;
    let mut net = net.write()?;
    net.put("Foo", 1)?;
    net.put("foo", 2)?;
    assert_eq!(net.get("FOO")?, Node::from(2));
    assert_eq!(net.raw()?, args!["NAME:VDD", "Foo:=", 2]);
    Ok(())
}
#[test]
fn registry_idempotence() -> AedtResult<()> {
    let instrumented = Arc::new(Instrumented::new(board()?));
    let mut session = Session::new(instrumented.clone());
    assert!(!session.components().is_populated());
    let first = session.components().lookup("U1")?;
    let second = session.components().lookup("u1")?;
    assert_eq!(first, second);
    assert_eq!(session.components().count()?, 3);
    assert_eq!(session.components().names()?, vec!["U1", "U2", "R1"]);
    assert_eq!(instrumented.enumerations(), 1);

    // Refreshing re-enumerates, and hands out fresh proxies
    session.refresh();
    let third = session.components().lookup("U1")?;
    assert_ne!(first, third);
    assert_eq!(instrumented.enumerations(), 2);
    Ok(())
}
#[test]
fn push_pop() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());
    let comps = session.components();
    assert_eq!(comps.count()?, 3);

    // Created outside the registry: invisible until pushed
    ctx.create(EntityKind::Component, "U3", &args!["NAME:U3", "PartName:=", "LDO"])?;
    assert!(!comps.contains("U3")?);
    let u3 = comps.push("U3")?;
    assert_eq!(comps.push("u3")?, u3);
    assert_eq!(comps.count()?, 4);
    assert_eq!(comps.lookup("U3")?.write()?.get("PartName")?.as_str(), Some("LDO"));

    // Deleted outside the registry: still listed until popped
    ctx.delete(EntityKind::Component, "U3")?;
    assert_eq!(comps.pop("U3")?, u3);
    assert_eq!(comps.count()?, 3);
    assert!(matches!(comps.pop("U3"), Err(AedtError::NotFound { .. })));
    assert!(matches!(comps.lookup("U3"), Err(AedtError::NotFound { .. })));
    Ok(())
}
#[test]
fn pattern_lookup() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let comps = session.components();
    assert_eq!(names(&comps.lookup_pattern(r"U\d+")?)?, vec!["U1", "U2"]);
    assert_eq!(names(&comps.lookup_pattern("u.*")?)?, vec!["U1", "U2"]);
    assert_eq!(names(&comps.lookup_pattern("R1")?)?, vec!["R1"]);
    assert!(matches!(comps.lookup_pattern(r"Q\d+"), Err(AedtError::NotFound { .. })));
    assert!(matches!(comps.lookup_pattern("U("), Err(AedtError::InvalidPattern { .. })));
    assert_eq!(
        names(&comps.lookup_many(&["U1", r"U\d+", "R1"])?)?,
        vec!["U1", "U2", "R1"]
    );
    Ok(())
}
#[test]
fn typed_selectors() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let comps = session.components();
    assert_eq!(names(&[comps.by_index(2)?])?, vec!["R1"]);
    assert!(matches!(comps.by_index(3), Err(AedtError::NotFound { .. })));
    assert_eq!(names(&comps.by_slice(1..10)?)?, vec!["U2", "R1"]);
    assert!(comps.by_slice(5..9)?.is_empty());
    assert_eq!(names(&comps.select(Selector::Index(0))?)?, vec!["U1"]);
    assert_eq!(names(&comps.select(Selector::Name("r1"))?)?, vec!["R1"]);
    assert_eq!(
        names(&comps.select(Selector::Names(&["R1", "U2"]))?)?,
        vec!["R1", "U2"]
    );
    Ok(())
}
#[test]
fn case_sensitive_names() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let options = Options {
        case_sensitive_names: true,
        ..Default::default()
    };
    let mut session = Session::with_options(ctx, options);
    let comps = session.components();
    assert!(comps.lookup("U1").is_ok());
    assert!(matches!(comps.lookup("u1"), Err(AedtError::NotFound { .. })));
    assert!(matches!(comps.lookup_pattern("u.*"), Err(AedtError::NotFound { .. })));
    Ok(())
}
#[test]
fn parse_failures_do_not_poison() -> AedtResult<()> {
    logging();
    let instrumented = Arc::new(Instrumented::new(board()?));
    let mut session = Session::new(instrumented.clone());
    let u1 = session.components().lookup("U1")?;
    instrumented.fail_next(1);
    {
        let mut u1 = u1.write()?;
        assert!(matches!(u1.get("PartName"), Err(AedtError::External { .. })));
        assert!(!u1.is_parsed());
        // The next access retries, and succeeds
        assert_eq!(u1.get("PartName")?.as_str(), Some("MCU"));
        assert!(u1.is_parsed());
    }
    assert_eq!(session.components().count()?, 3);
    assert_eq!(session.components().lookup("U1")?, u1);
    assert_eq!(instrumented.enumerations(), 1);
    Ok(())
}
#[test]
fn held_guards_do_not_block_the_registry() -> AedtResult<()> {
    logging();
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());
    let comps = session.components();
    let u1 = comps.lookup("U1")?;
    let mut u1 = u1.write()?;
    u1.set("Placement", "Bottom")?;

    // Listing and deleting others never touch the locked entity
    assert_eq!(comps.names()?, vec!["U1", "U2", "R1"]);
    comps.delete("U2")?;
    assert_eq!(comps.names()?, vec!["U1", "R1"]);
    assert_eq!(ctx.enumerate(EntityKind::Component)?, vec!["U1", "R1"]);

    // Filtering skips it
    let unlocked = comps.filter(|_| Ok(true))?;
    assert_eq!(names(&unlocked)?, vec!["R1"]);
    drop(u1);
    assert_eq!(comps.filter(|_| Ok(true))?.len(), 2);
    Ok(())
}
#[test]
fn malformed_payloads_name_their_entity() -> AedtResult<()> {
    let ctx = MemoryContext::new().with(
        EntityKind::Padstack,
        "via9",
        args!["NAME:via9", "psd:=", ["hle:="]],
    )?;
    let mut session = Session::new(Arc::new(ctx));
    let via = session.padstacks().lookup("via9")?;
    let res = via.write()?.get("psd");
    match res {
        Err(AedtError::MalformedTree { stack, .. }) => assert_eq!(
            utils::context_path(&stack),
            "<Padstack>/via9/via9/psd/hle"
        ),
        other => panic!("{:?}", other),
    }
    assert!(!via.read()?.is_parsed());
    Ok(())
}
#[test]
fn filter_isolates_failures() -> AedtResult<()> {
    logging();
    let instrumented = Arc::new(Instrumented::new(board()?));
    let mut session = Session::new(instrumented.clone());
    let comps = session.components();
    comps.count()?;
    instrumented.fail_next(1);
    let others = comps.filter(|e| Ok(e.get("PartClass")?.as_str() == Some("Other")))?;
    // U1 fails to parse and is skipped
    assert_eq!(names(&others)?, vec!["U2"]);
    let resistors = comps.filter(|e| Ok(e.get("PartClass")?.as_str() == Some("Resistor")))?;
    assert_eq!(names(&resistors)?, vec!["R1"]);
    Ok(())
}
#[test]
fn write_through_and_deferred() -> AedtResult<()> {
    logging();
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());

    // Components submit each edit immediately
    let u1 = session.components().lookup("U1")?;
    u1.write()?.set("Placement", "Bottom")?;
    assert_eq!(
        ctx.fetch(EntityKind::Component, "U1")?,
        args!["NAME:U1", "PartName:=", "MCU", "Placement:=", "Bottom"]
    );
    assert!(!u1.read()?.is_dirty());
    assert!(matches!(
        u1.write()?.set("Rotation", "90deg"),
        Err(AedtError::KeyNotFound { .. })
    ));

    // Nets wait for `update`
    let vdd = session.nets().lookup("VDD")?;
    let mut vdd = vdd.write()?;
    vdd.put("Color", "red")?;
    assert!(vdd.is_dirty());
    assert_eq!(ctx.fetch(EntityKind::Net, "VDD")?, args!["NAME:VDD"]);
    vdd.update()?;
    assert!(!vdd.is_dirty());
    assert_eq!(
        ctx.fetch(EntityKind::Net, "VDD")?,
        args!["NAME:VDD", "Color:=", "red"]
    );

    // Forced re-parsing discards unsubmitted edits
    vdd.set("Color", "blue")?;
    vdd.parse(true)?;
    assert_eq!(vdd.get("Color")?.as_str(), Some("red"));
    Ok(())
}
#[test]
fn component_properties() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let u1 = session.components().lookup("U1")?;
    let mut u1 = u1.write()?;
    assert_eq!(u1.get("Name")?.as_str(), Some("U1"));
    assert_eq!(
        u1.get("PinNames")?,
        Node::from(vec!["U1-1".to_string(), "U1-2".to_string()])
    );
    assert_eq!(
        u1.get("ShortPinNames")?,
        Node::from(vec!["1".to_string(), "2".to_string()])
    );
    assert_eq!(u1.get("PinCount")?, Node::from(2));
    assert!(u1.has("PinCount")?);
    assert!(matches!(u1.set("PinCount", 3), Err(AedtError::ReadOnly { .. })));

    let r1 = session.components().lookup("R1")?;
    let mut r1 = r1.write()?;
    assert_eq!(r1.get("PartClass")?.as_str(), Some("Resistor"));
    assert_eq!(r1.get("PinCount")?, Node::from(1));
    Ok(())
}
#[test]
fn pin_and_net_properties() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let pin = session.pins().lookup("U1-2")?;
    let mut pin = pin.write()?;
    assert_eq!(pin.get("CompName")?.as_str(), Some("U1"));
    assert_eq!(pin.get("PinName")?.as_str(), Some("2"));
    assert_eq!(pin.get("IsSMTPad")?, Node::from(false));
    let smt = session.pins().lookup("U1-1")?;
    assert_eq!(smt.write()?.get("IsSMTPad")?, Node::from(true));

    for (net, class) in [("VDD", NetClass::Power), ("GND", NetClass::Ground), ("DQ0", NetClass::Signal)] {
        let net = session.nets().lookup(net)?;
        let class_name = net.write()?.get("NetClass")?;
        assert_eq!(class_name.as_str(), Some(class.to_str()));
    }
    Ok(())
}
#[test]
fn layer_thickness() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx);
    let top = session.layers().lookup("TOP")?;
    assert_eq!(
        top.write()?.get("ThicknessValue")?,
        Node::from(Quantity::new(0.035, Unit::Mm))
    );
    let bottom = session.layers().lookup("BOTTOM")?;
    assert_eq!(
        bottom.write()?.get("ThicknessValue")?,
        Node::from(Quantity::new(35.0, Unit::Um))
    );
    Ok(())
}
#[test]
fn padstacks() -> AedtResult<()> {
    logging();
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());
    let via = session.padstacks().lookup("via8")?;
    {
        let mut via = via.write()?;
        assert_eq!(via.get("DrillSize")?, Node::from("8mil"));
        let top = padstack_layer_sizes(&via.get("TOP")?)?;
        assert_eq!(top.get("PadSize")?.as_ref(), &Node::from("16mil"));
        assert_eq!(top.get("AntipadSize")?.as_ref(), &Node::from("24mil"));
        assert!(!via.has("BOTTOM")?);

        // Adding a layer submits it, and exposes it as a property
        padstack_append_layer(&mut via, "BOTTOM")?;
        assert!(via.has("BOTTOM")?);
        let bottom = padstack_layer_sizes(&via.get("BOTTOM")?)?;
        assert!(matches!(bottom.get("PadSize"), Err(AedtError::KeyNotFound { .. })));
    }
    let stored = decode(&ctx.fetch(EntityKind::Padstack, "via8")?)?;
    assert_eq!(
        stored.get_path("psd/pds").map(|pds| pds.as_seq().map(Seq::len)),
        Some(Some(2))
    );

    // Renaming re-tags the payload, and refreshes the registry
    let renamed = rename_definition(session.padstacks(), "via8", "via10")?;
    assert_eq!(renamed.read()?.name(), "via10");
    assert_eq!(session.padstacks().names()?, vec!["via10"]);
    assert_eq!(renamed.write()?.get("DrillSize")?, Node::from("8mil"));
    assert!(rename_definition(session.components(), "U1", "U9").is_err());
    Ok(())
}
#[test]
fn pin_groups() -> AedtResult<()> {
    logging();
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());
    let group = create_pin_group(&mut session, &["1", "2"], Some("U1"), None)?;
    {
        let mut group = group.write()?;
        assert_eq!(group.name(), "PinGroup_GND_U1-1");
        assert_eq!(group.get("PinCount")?, Node::from(2));
        assert_eq!(group.get("CompName")?.as_str(), Some("U1"));
        assert_eq!(
            group.get("PinNames")?,
            Node::from(vec!["U1-1".to_string(), "U1-2".to_string()])
        );
        // Pin groups defer their edits
        group.edit(|m| {
            m.append("R1-1");
            Ok(())
        })?;
        assert!(group.is_dirty());
    }
    assert_eq!(
        ctx.fetch(EntityKind::PinGroup, "PinGroup_GND_U1-1")?,
        args!["NAME:PinGroup_GND_U1-1", "U1-1", "U1-2"]
    );

    // A second group over the same pins gets a unique name
    let again = create_pin_group(&mut session, &["U1-1"], None, None)?;
    assert_eq!(again.read()?.name(), "PinGroup_GND_U1-1_1");
    assert_eq!(session.pin_groups().count()?, 2);

    session.pin_groups().delete("PinGroup_GND_U1-1_1")?;
    assert_eq!(session.pin_groups().count()?, 1);
    assert_eq!(ctx.enumerate(EntityKind::PinGroup)?, vec!["PinGroup_GND_U1-1"]);
    assert!(create_pin_group(&mut session, &[], None, None).is_err());
    Ok(())
}
#[test]
fn registry_create_and_unique_names() -> AedtResult<()> {
    let ctx = Arc::new(board()?);
    let mut session = Session::new(ctx.clone());
    let models = session.models();
    assert_eq!(models.unique_name("cap")?, "cap");
    models.create("cap", &args!["NAME:cap", "ModelType:=", "nport"])?;
    assert_eq!(models.unique_name("CAP")?, "CAP_1");
    models.create("cap_1", &args!["NAME:cap_1"])?;
    assert_eq!(models.unique_name("cap")?, "cap_2");
    assert!(models.create("Cap", &args!["NAME:Cap"]).is_err());
    assert_eq!(models.lookup("cap")?.write()?.get("ModelType")?.as_str(), Some("nport"));
    models.delete("CAP")?;
    models.delete("cap_1")?;
    assert!(ctx.enumerate(EntityKind::Model)?.is_empty());
    assert!(matches!(models.delete("cap"), Err(AedtError::NotFound { .. })));
    Ok(())
}
#[test]
fn snapshots_reload() -> AedtResult<()> {
    let ctx = board()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("board.yaml");
    ctx.save(SerializationFormat::Yaml, &path)?;
    let mut session = Session::new(Arc::new(MemoryContext::open(&path)?));
    assert_eq!(session.components().count()?, 3);
    let via = session.padstacks().lookup("via8")?;
    assert_eq!(via.write()?.raw()?, via8());
    Ok(())
}
#[test]
fn options_from_files() -> AedtResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.yaml");
    std::fs::write(&path, "design_unit: mil\ncase_sensitive_names: true\n")?;
    let opts = Options::open_any(&path)?;
    assert_eq!(opts.design_unit()?, Unit::Mil);
    assert!(opts.case_sensitive_names);
    // Unlisted fields take their defaults
    assert_eq!(opts.backdrill_stub, "8mil");

    let path = dir.path().join("options.json");
    opts.save(SerializationFormat::Json, &path)?;
    assert_eq!(Options::open_any(&path)?, opts);
    Ok(())
}
#[test]
fn options_from_environment() -> AedtResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.toml");
    Options::default().save(SerializationFormat::Toml, &path)?;
    std::env::set_var("AEDT21_CUT_EXPANSION", "2mm");
    let opts = Options::load(&path);
    std::env::remove_var("AEDT21_CUT_EXPANSION");
    let opts = opts?;
    assert_eq!(opts.cut_expansion()?, Quantity::new(2.0, Unit::Mm));
    assert_eq!(opts.design_unit()?, Unit::Mm);
    Ok(())
}
#[test]
fn independent_sessions() -> AedtResult<()> {
    let mut a = Session::new(Arc::new(board()?));
    let mut b = Session::new(Arc::new(MemoryContext::new()));
    assert_eq!(a.components().count()?, 3);
    assert_eq!(b.components().count()?, 0);
    assert!(matches!(b.components().lookup("U1"), Err(AedtError::NotFound { .. })));
    Ok(())
}
