use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlowreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FlowreelError::config("x").to_string().contains("config error:"));
    assert!(
        FlowreelError::scheduling("x")
            .to_string()
            .contains("scheduling error:")
    );
    assert!(
        FlowreelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(FlowreelError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlowreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_converts_into_other() {
    fn fails() -> FlowreelResult<()> {
        Err(anyhow::anyhow!("disk on fire"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, FlowreelError::Other(_)));
}
