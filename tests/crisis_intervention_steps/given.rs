//! Given steps for crisis intervention BDD scenarios.

use std::sync::Arc;

use super::world::{CrisisWorld, run_async};
use aimate::completion::adapters::scripted::ScriptedReply;
use aimate::conversation::domain::ConversationContext;
use aimate::plugin::services::PluginRegistration;
use aimate::safety::domain::{REGION_SETTING, SafetyConfig};
use aimate::safety::services::MentalHealthSafetyPlugin;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a chat assistant guarded by the safety plugin")]
fn guarded_assistant(world: &mut CrisisWorld) -> Result<(), eyre::Report> {
    let plugin = MentalHealthSafetyPlugin::new(SafetyConfig::default(), Arc::clone(&world.clock))
        .wrap_err("build safety plugin")?;
    let registration = PluginRegistration::builder(Arc::new(plugin))
        .intercepts_messages()
        .extends_ui()
        .build();
    run_async(world.plugins.register(registration)).wrap_err("register safety plugin")?;
    world.start_service();
    Ok(())
}

#[given(r#"the model will reply "{reply}""#)]
fn model_will_reply(world: &mut CrisisWorld, reply: String) {
    world.backend.push(ScriptedReply::Text(reply));
}

#[given(r#"the user's region is "{region}""#)]
fn users_region(world: &mut CrisisWorld, region: String) {
    world.context = ConversationContext::new(world.context.conversation_id())
        .with_user_setting(REGION_SETTING, region);
}
