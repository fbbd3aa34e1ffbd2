//! Tool discovery and dispatch.

use super::guard::{catch_panic, catch_panic_sync};
use super::manager::PluginManager;
use crate::plugin::domain::{PluginStage, RegisteredTool, ToolParameters, ToolResult};
use tracing::{error, info, instrument, warn};

impl PluginManager {
    /// Lists every tool offered by every tool provider.
    ///
    /// A provider whose `tools()` call fails or panics contributes nothing;
    /// the failure is logged and published.
    #[must_use]
    pub fn all_tools(&self) -> Vec<RegisteredTool> {
        let mut tools = Vec::new();
        for (plugin_id, provider) in self.tool_provider_snapshot() {
            let listed = match catch_panic_sync(|| provider.tools()) {
                Ok(Ok(listed)) => listed,
                Ok(Err(err)) => {
                    error!(plugin_id = %plugin_id, error = %err, "failed to list tools");
                    self.publish_error(&plugin_id, PluginStage::ListTools, err.to_string());
                    continue;
                }
                Err(panic) => {
                    error!(plugin_id = %plugin_id, panic = %panic, "tool listing panicked");
                    self.publish_error(&plugin_id, PluginStage::ListTools, panic);
                    continue;
                }
            };
            tools.extend(listed.into_iter().map(|tool| RegisteredTool {
                plugin_id: plugin_id.clone(),
                tool,
            }));
        }
        tools
    }

    /// Executes `tool_name` on the plugin registered as `plugin_id`.
    ///
    /// Arguments are validated against the tool's declared parameters and
    /// missing optional ones are filled from their defaults before the
    /// provider runs. Every failure is reported as a failure
    /// [`ToolResult`]; this method never panics.
    #[instrument(skip(self, parameters))]
    pub async fn execute_tool(
        &self,
        plugin_id: &str,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> ToolResult {
        let Some((owner, provider)) = self
            .tool_provider_snapshot()
            .into_iter()
            .find(|(id, _)| id.as_str() == plugin_id)
        else {
            warn!("tool provider not found");
            return ToolResult::failure(format!("plugin {plugin_id} not found"));
        };

        let tools = match catch_panic_sync(|| provider.tools()) {
            Ok(Ok(tools)) => tools,
            Ok(Err(err)) => {
                error!(error = %err, "failed to list tools");
                self.publish_error(&owner, PluginStage::ListTools, err.to_string());
                return ToolResult::failure(err.to_string());
            }
            Err(panic) => {
                error!(panic = %panic, "tool listing panicked");
                self.publish_error(&owner, PluginStage::ListTools, panic.clone());
                return ToolResult::failure(panic);
            }
        };
        let Some(tool) = tools.iter().find(|tool| tool.name() == tool_name) else {
            warn!("tool not found");
            return ToolResult::failure(format!(
                "tool {tool_name} not found in plugin {plugin_id}"
            ));
        };
        let arguments = match tool.validate_parameters(parameters) {
            Ok(arguments) => arguments,
            Err(err) => {
                warn!(error = %err, "tool arguments rejected");
                return ToolResult::failure(err.to_string());
            }
        };

        info!("executing tool");
        match catch_panic(provider.execute_tool(tool_name, arguments)).await {
            Ok(Ok(result)) => {
                info!(success = result.is_success(), "tool finished");
                result
            }
            Ok(Err(err)) => {
                error!(error = %err, "tool execution failed");
                self.publish_error(&owner, PluginStage::ExecuteTool, err.to_string());
                ToolResult::failure(err.to_string())
            }
            Err(panic) => {
                error!(panic = %panic, "tool execution panicked");
                self.publish_error(&owner, PluginStage::ExecuteTool, panic.clone());
                ToolResult::failure(format!("tool panicked: {panic}"))
            }
        }
    }
}
