use ggez::event::{self, EventHandler};
use ggez::input::keyboard::KeyCode;
use ggez::mint::Point2;
use ggez::{graphics, Context, GameError, GameResult};
use log::info;

mod engine;

use engine::{Config, Direction, Engine, Step, CELL_SIZE};

// Colors
const BACKGROUND_COLOR: graphics::Color = graphics::Color::new(0.10, 0.10, 0.18, 1.0);
const WALL_COLOR: graphics::Color = graphics::Color::new(0.27, 0.27, 0.27, 1.0);
const HEAD_COLOR: graphics::Color = graphics::Color::new(1.0, 1.0, 1.0, 1.0);
const BODY_COLOR: graphics::Color = graphics::Color::new(0.4, 0.8, 1.0, 1.0);
const FOOD_COLOR: graphics::Color = graphics::Color::new(1.0, 0.8, 0.0, 1.0);

struct Scene {
    config: Config,
    engine: Engine,
}

impl Scene {
    fn new(config: Config) -> GameResult<Self> {
        let engine = Engine::new(config).map_err(|e| GameError::CustomError(e.to_string()))?;
        Ok(Scene { config, engine })
    }

    fn cell_rect(&self, x: i16, y: i16) -> graphics::Rect {
        graphics::Rect::new(
            (x * CELL_SIZE) as f32,
            (y * CELL_SIZE) as f32,
            CELL_SIZE as f32,
            CELL_SIZE as f32,
        )
    }

    fn draw_walls(&self, ctx: &mut Context, canvas: &mut graphics::Canvas) -> GameResult {
        let width = (self.config.grid_width * CELL_SIZE) as f32;
        let height = (self.config.grid_height * CELL_SIZE) as f32;
        let thickness = CELL_SIZE as f32;
        let bands = [
            graphics::Rect::new(0.0, 0.0, width, thickness),
            graphics::Rect::new(0.0, height - thickness, width, thickness),
            graphics::Rect::new(0.0, 0.0, thickness, height),
            graphics::Rect::new(width - thickness, 0.0, thickness, height),
        ];
        for band in bands {
            canvas.draw(
                &graphics::Mesh::new_rectangle(ctx, graphics::DrawMode::fill(), band, WALL_COLOR)?,
                graphics::DrawParam::default(),
            );
        }
        Ok(())
    }

    fn draw_game(&self, ctx: &mut Context, canvas: &mut graphics::Canvas) -> GameResult {
        self.draw_walls(ctx, canvas)?;

        for (i, segment) in self.engine.segments().iter().enumerate() {
            let color = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
            canvas.draw(
                &graphics::Mesh::new_rectangle(
                    ctx,
                    graphics::DrawMode::fill(),
                    self.cell_rect(segment.x, segment.y),
                    color,
                )?,
                graphics::DrawParam::default(),
            );
        }

        let food = self.engine.food();
        canvas.draw(
            &graphics::Mesh::new_rectangle(
                ctx,
                graphics::DrawMode::fill(),
                self.cell_rect(food.x, food.y),
                FOOD_COLOR,
            )?,
            graphics::DrawParam::default(),
        );

        let score_text = graphics::Text::new(format!("Score: {}", self.engine.score()));
        canvas.draw(
            &score_text,
            graphics::DrawParam::default()
                .dest(Point2 { x: 16.0, y: 16.0 })
                .color(graphics::Color::WHITE),
        );

        Ok(())
    }

    fn draw_game_over(&self, canvas: &mut graphics::Canvas) {
        let center_x = (self.config.grid_width * CELL_SIZE) as f32 / 2.0;
        let center_y = (self.config.grid_height * CELL_SIZE) as f32 / 2.0;

        let mut over_text = graphics::Text::new("GAME OVER");
        let over_text = over_text.set_scale(48.0);
        canvas.draw(
            over_text,
            graphics::DrawParam::default()
                .dest(Point2 {
                    x: center_x - 130.0,
                    y: center_y - 40.0,
                })
                .color(graphics::Color::RED),
        );

        let mut hint_text = graphics::Text::new("Restart the program to play again");
        let hint_text = hint_text.set_scale(24.0);
        canvas.draw(
            hint_text,
            graphics::DrawParam::default()
                .dest(Point2 {
                    x: center_x - 170.0,
                    y: center_y + 20.0,
                })
                .color(graphics::Color::WHITE),
        );
    }
}

impl EventHandler for Scene {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        // Poll the keyboard once per frame; the engine buffers the turn
        // and rejects reversals itself.
        let keyboard = &ctx.keyboard;
        if keyboard.is_key_pressed(KeyCode::Left) {
            self.engine.request_turn(Direction::Left);
        } else if keyboard.is_key_pressed(KeyCode::Right) {
            self.engine.request_turn(Direction::Right);
        } else if keyboard.is_key_pressed(KeyCode::Up) {
            self.engine.request_turn(Direction::Up);
        } else if keyboard.is_key_pressed(KeyCode::Down) {
            self.engine.request_turn(Direction::Down);
        }

        let now_ms = ctx.time.time_since_start().as_millis() as u64;
        match self.engine.tick(now_ms) {
            Ok(Some(Step::Ate { score, .. })) => info!("food eaten, score {score}"),
            Ok(Some(Step::Died { score })) => info!("game over, final score {score}"),
            Ok(_) => {}
            Err(e) => return Err(GameError::CustomError(e.to_string())),
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, BACKGROUND_COLOR);

        self.draw_game(ctx, &mut canvas)?;
        if self.engine.is_game_over() {
            self.draw_game_over(&mut canvas);
        }

        canvas.finish(ctx)?;
        Ok(())
    }
}

fn main() -> GameResult {
    env_logger::init();

    let config = Config::default();
    let screen_width = (config.grid_width * CELL_SIZE) as f32;
    let screen_height = (config.grid_height * CELL_SIZE) as f32;

    let window_setup = ggez::conf::WindowSetup::default().title("Snake").vsync(true);
    let window_mode = ggez::conf::WindowMode::default()
        .dimensions(screen_width, screen_height)
        .resizable(false);

    let (ctx, event_loop) = ggez::ContextBuilder::new("grid_snake", "grid_snake")
        .window_setup(window_setup)
        .window_mode(window_mode)
        .build()?;

    info!(
        "starting {}x{} arena, {}px cells",
        config.grid_width, config.grid_height, CELL_SIZE
    );

    let scene = Scene::new(config)?;
    event::run(ctx, event_loop, scene)
}
