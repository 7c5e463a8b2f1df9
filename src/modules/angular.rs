use crate::rules::{MigrationRule, RuleEntry, create_entries};

/// `@qui/angular` exports split across `@qui/angular-core`, `@qui/core` and `@qui/utils`.
pub fn angular() -> Vec<MigrationRule> {
    create_entries(
        "@qui/angular",
        vec![
            RuleEntry::new("@qui/core/overlay-panel")
                .rename("QAnimation", "OverlayPanelAnimation")
                .rename_variable("QAnimation", "OverlayPanelAnimation"),
            RuleEntry::new("@qui/utils/change-case").imports([
                "camelCase",
                "pascalCase",
                "noCase",
                "Locale",
                "PascalCaseOptions",
                "Options",
            ]),
            RuleEntry::new("@qui/utils/coercion").imports(["Booleanish"]),
            RuleEntry::new("@qui/utils/transitions")
                .rename("QAnimationEasing", "AnimationEasing")
                .rename_variable("QAnimationEasing", "AnimationEasing"),
            RuleEntry::new("@qui/angular-core/attributes")
                .imports(["pixelAttribute", "safeNumberAttribute"]),
            RuleEntry::new("@qui/angular-core/common").imports(["CoercibleBoolean", "NgChanges"]),
            RuleEntry::new("@qui/angular-core/dom")
                .imports([
                    "CACHES",
                    "CSS",
                    "LOCAL_STORAGE",
                    "LOCATION",
                    "MEDIA_DEVICES",
                    "NAVIGATOR",
                    "PERFORMANCE",
                    "SCREEN",
                    "USER_AGENT",
                    "WINDOW",
                    "IdService",
                    "elementIdSignal",
                    "ClipboardService",
                ])
                .rename("QConfigService", "PortalConfigService")
                .rename("QDomService", "DomService")
                .rename_variable("QConfigService", "PortalConfigService")
                .rename_variable("QDomService", "DomService"),
            RuleEntry::new("@qui/angular-core/events")
                .imports(["ListenerConfig", "ListenerService"])
                .rename("QTrigger", "ListenerTrigger")
                .rename("QTriggerOn", "ListenerTriggerOn")
                .rename("QTriggerOff", "ListenerTriggerOff")
                .rename("QTriggerToggle", "ListenerTriggerToggle")
                .rename_variable("QTrigger", "ListenerTrigger")
                .rename_variable("QTriggerOn", "ListenerTriggerOn")
                .rename_variable("QTriggerOff", "ListenerTriggerOff")
                .rename_variable("QTriggerToggle", "ListenerTriggerToggle"),
            RuleEntry::new("@qui/angular-core/lucide")
                .imports([
                    "LucideIconArrayData",
                    "LucideIconCompat",
                    "LucideIcon",
                    "IconOrTemplate",
                    "LUCIDE_ICONS",
                    "LucideIconProviderValue",
                    "provideIcons",
                ])
                .rename("IconTemplate", "IconOrTemplate")
                .rename_variable("IconTemplate", "IconOrTemplate"),
            RuleEntry::new("@qui/angular-core/signals").imports([
                "SignalifyInput",
                "assertInjector",
                "hostBinding",
                "signalifyObject",
            ]),
            RuleEntry::new("@qui/angular-core/state")
                .imports(["ControlledState", "ControlledStateService"]),
        ],
    )
}
