use eframe::egui::{self, Context, RichText};
use tracing::warn;

use super::super::requests::{poll_request, spawn_login};
use super::super::LoginForm;

impl LoginForm {
    pub(in crate::app) fn show(&mut self, ctx: &Context) -> Option<String> {
        let mut token = None;
        match poll_request(&mut self.pending) {
            Some(Ok(access_token)) => {
                self.error = None;
                token = Some(access_token);
            }
            Some(Err(error)) => {
                warn!(%error, "sign-in failed");
                self.error = Some(if error.is_auth() {
                    "Invalid credentials.".to_owned()
                } else {
                    error.to_string()
                });
            }
            None => {}
        }

        let busy = self.pending.is_some();
        if busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("Contagion Lens");
                ui.label("Social contagion playback and intervention console");
                ui.small(self.client.base_url());
                ui.add_space(16.0);

                ui.add_enabled_ui(!busy, |ui| {
                    ui.label("Username");
                    ui.add(egui::TextEdit::singleline(&mut self.username).desired_width(220.0));
                    ui.label("Password");
                    let password = ui.add(
                        egui::TextEdit::singleline(&mut self.password)
                            .password(true)
                            .desired_width(220.0),
                    );
                    ui.add_space(8.0);

                    let submitted = ui.button("Sign in").clicked()
                        || (password.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter)));
                    if submitted && self.pending.is_none() {
                        self.pending = Some(spawn_login(
                            self.client.clone(),
                            self.username.trim().to_owned(),
                            self.password.clone(),
                        ));
                    }
                });

                if busy {
                    ui.add_space(8.0);
                    ui.spinner();
                }

                if let Some(error) = &self.error {
                    ui.add_space(8.0);
                    ui.label(RichText::new(error).color(egui::Color32::from_rgb(239, 68, 68)));
                }
            });
        });

        token
    }
}
