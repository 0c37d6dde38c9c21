crate::define_id_enum! {
    /// Capability marker applied to a project by the build
    PluginId {
        Java => "java" : "Java" | "org.gradle.java",
        JavaLibrary => "java-library" : "Java Library" | "org.gradle.java-library",
        War => "war" : "War" | "org.gradle.war",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_id_serialization() {
        assert_eq!(serde_json::to_string(&PluginId::War).unwrap(), "\"war\"");
        assert_eq!(
            serde_json::to_string(&PluginId::JavaLibrary).unwrap(),
            "\"java-library\""
        );
    }

    #[test]
    fn test_plugin_id_aliases() {
        assert_eq!(PluginId::parse("org.gradle.war"), PluginId::War);
        assert_eq!(PluginId::parse("org.gradle.java"), PluginId::Java);
        assert_eq!(PluginId::parse("java-library"), PluginId::JavaLibrary);
    }

    #[test]
    fn test_custom_plugin_deserialization() {
        let plugin: PluginId = serde_json::from_str("\"ear\"").unwrap();
        assert_eq!(plugin, PluginId::Custom("ear".to_string()));
        assert!(plugin.is_custom());
        assert_eq!(plugin.to_string(), "ear");
    }

    #[test]
    fn test_known_plugins() {
        assert_eq!(PluginId::known().len(), 3);
        assert!(PluginId::known().iter().all(|p| !p.is_custom()));
    }
}
